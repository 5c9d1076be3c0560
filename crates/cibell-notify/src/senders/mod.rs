//! Per-platform sender implementations.
//!
//! Each sender pairs the pure payload builders with the shared transport:
//! build payload, attach signature, POST, parse. The platforms differ
//! only in how the JSON is shaped and where the signature travels.

pub mod ding;
pub mod lark;

use std::sync::Arc;

use crate::error::Result;
use crate::robot::RobotRuntimeConfig;
use crate::transport;
use crate::MessageSender;

pub use ding::DingSender;
pub use lark::LarkSender;

/// Builds the sender implementation matching the robot's platform.
pub fn build_sender(runtime: RobotRuntimeConfig) -> Result<Arc<dyn MessageSender>> {
    let client = transport::build_client(&runtime)?;
    let sender: Arc<dyn MessageSender> = if runtime.kind.is_lark_family() {
        Arc::new(LarkSender::new(runtime, client))
    } else {
        Arc::new(DingSender::new(runtime, client))
    };
    Ok(sender)
}
