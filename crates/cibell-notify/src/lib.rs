//! Platform-agnostic chat notification rendering and dispatch.
//!
//! A CI job describes one notification as a [`message::MessageModel`];
//! the [`dispatcher::MessageDispatcher`] resolves the target robot from
//! its configured webhook, renders the platform-specific wire JSON
//! (Lark, Feishu, DingTalk), attaches the HMAC signature when a shared
//! secret is configured, and performs the webhook POST. Every outcome of
//! the send path — configuration problems, unsupported message kinds,
//! transport failures, remote errors — is reported as a [`SendResult`]
//! value; nothing on that path panics or returns an error type.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod payload;
pub mod robot;
pub mod senders;
pub mod sign;
pub mod transport;
pub mod utils;


use async_trait::async_trait;
use serde::Deserialize;

pub use crate::config::NotifyConfig;
pub use crate::dispatcher::MessageDispatcher;
pub use crate::message::{MessageModel, MsgType};
pub use crate::robot::{RobotConfig, RobotKind};

/// Fixed diagnostic returned for message kinds a platform does not implement.
pub const UNSUPPORTED_MESSAGE: &str = "This type of message is not supported.";

/// Outcome of one delivery attempt.
///
/// The platforms report their own status as a JSON envelope whose field
/// names differ per API generation; both spellings are accepted
/// (`code`/`errcode`, `msg`/`errmsg`). A code of `0` is the only success
/// value; a missing code — which is what a transport failure produces —
/// is never treated as success.
///
/// # Examples
///
/// ```
/// use cibell_notify::SendResult;
///
/// let ok: SendResult = serde_json::from_str(r#"{"code":0,"msg":"success"}"#).unwrap();
/// assert!(ok.is_ok());
///
/// let err = SendResult::fail("connection refused");
/// assert!(!err.is_ok());
/// assert_eq!(err.code, Some(-1));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResult {
    /// Remote status code; `0` denotes success, `-1` is the local failure
    /// sentinel.
    #[serde(alias = "errcode")]
    pub code: Option<i64>,

    /// Remote diagnostic text, or the local failure description.
    #[serde(default, alias = "errmsg")]
    pub msg: Option<String>,

    /// Exact JSON body that was POSTed, retained for debugging.
    #[serde(skip)]
    pub request_body: Option<String>,
}

impl SendResult {
    /// Creates a failure result carrying the given diagnostic.
    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            code: Some(-1),
            msg: Some(msg.into()),
            request_body: None,
        }
    }

    /// True only when the remote reported code `0`.
    pub fn is_ok(&self) -> bool {
        self.code == Some(0)
    }

    /// The diagnostic text, or an empty string when the remote sent none.
    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }
}

/// One message-sending strategy bound to a single robot.
///
/// Text and markdown are universal across the supported platforms; the
/// remaining operations default to a failure [`SendResult`] so a platform
/// without the concept reports "not supported" instead of panicking.
/// Implementations must convert every transport or protocol failure into
/// a failure result as well.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, msg: &MessageModel) -> SendResult;

    /// Sends a markdown message.
    async fn send_markdown(&self, msg: &MessageModel) -> SendResult;

    /// Sends an image message.
    async fn send_image(&self, _msg: &MessageModel) -> SendResult {
        SendResult::fail(UNSUPPORTED_MESSAGE)
    }

    /// Sends a share-chat message.
    async fn send_share_chat(&self, _msg: &MessageModel) -> SendResult {
        SendResult::fail(UNSUPPORTED_MESSAGE)
    }

    /// Sends a rich-text (post) message.
    async fn send_post(&self, _msg: &MessageModel) -> SendResult {
        SendResult::fail(UNSUPPORTED_MESSAGE)
    }

    /// Sends a link message.
    async fn send_link(&self, _msg: &MessageModel) -> SendResult {
        SendResult::fail(UNSUPPORTED_MESSAGE)
    }

    /// Sends an interactive card message.
    async fn send_card(&self, _msg: &MessageModel) -> SendResult {
        SendResult::fail(UNSUPPORTED_MESSAGE)
    }
}
