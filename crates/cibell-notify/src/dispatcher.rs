//! Robot lookup and sender caching — the single entry point for callers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::config::NotifyConfig;
use crate::message::MessageModel;
use crate::robot::RobotRuntimeConfig;
use crate::senders::build_sender;
use crate::utils::{truncate_string, MAX_BODY_LENGTH};
use crate::{MessageSender, SendResult};

/// Dispatches messages to configured robots, lazily building and caching
/// one sender per robot id.
///
/// The configuration is injected at construction and replaced through
/// [`MessageDispatcher::reload`]; a send that captured a sender before a
/// reload may still complete with the old configuration, which is
/// acceptable for fire-and-forget notifications.
///
/// # Examples
///
/// ```
/// use cibell_notify::config::NotifyConfig;
/// use cibell_notify::dispatcher::MessageDispatcher;
/// use cibell_notify::message::{MessageModel, MsgType};
///
/// # tokio_test::block_on(async {
/// let dispatcher = MessageDispatcher::new(NotifyConfig::default());
/// let result = dispatcher.send("missing", &MessageModel::new(MsgType::Text)).await;
/// assert!(!result.is_ok());
/// # });
/// ```
pub struct MessageDispatcher {
    config: RwLock<NotifyConfig>,
    senders: Mutex<HashMap<String, Arc<dyn MessageSender>>>,
}

impl MessageDispatcher {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config: RwLock::new(config),
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the robot configuration and drops every cached sender so
    /// stale webhooks or secrets are never reused.
    pub fn reload(&self, config: NotifyConfig) {
        {
            *self.config.write().unwrap() = config;
        }
        self.clear_senders();
    }

    /// Invalidates the sender cache; the next send per robot rebuilds
    /// from the current configuration.
    pub fn clear_senders(&self) {
        self.senders.lock().unwrap().clear();
    }

    /// Sends one message to the robot identified by `robot_id`.
    ///
    /// Configuration problems — unknown robot id, a webhook host no
    /// platform claims, a missing message type — are reported as failure
    /// results without any network activity. Delivery problems are
    /// reported the same way; this method never panics on bad input and
    /// never returns an error type.
    pub async fn send(&self, robot_id: &str, msg: &MessageModel) -> SendResult {
        let sender = match self.sender(robot_id) {
            Ok(sender) => sender,
            Err(reason) => return SendResult::fail(reason),
        };

        let Some(msg_type) = msg.msg_type else {
            return SendResult::fail("Message type cannot be null.");
        };

        let result = msg_type.dispatch(sender.as_ref(), msg).await;

        if let Some(body) = result.request_body.as_deref() {
            tracing::debug!(
                robot_id,
                body = %truncate_string(body, MAX_BODY_LENGTH),
                "webhook request sent"
            );
        }
        if !result.is_ok() {
            tracing::error!(
                robot_id,
                code = ?result.code,
                msg = %result.message(),
                "notification delivery failed"
            );
        }
        result
    }

    /// Cached sender for the robot, built on first use from the current
    /// configuration snapshot. The cache lock is held across the whole
    /// lookup so concurrent first uses build a single instance. A failed
    /// resolution is not cached and is retried on the next send.
    pub(crate) fn sender(&self, robot_id: &str) -> Result<Arc<dyn MessageSender>, String> {
        let mut senders = self.senders.lock().unwrap();
        if let Some(sender) = senders.get(robot_id) {
            return Ok(Arc::clone(sender));
        }

        let (robot, proxy) = {
            let config = self.config.read().unwrap();
            match config.robot(robot_id) {
                Some(robot) => (robot.clone(), config.proxy_url().map(str::to_string)),
                None => return Err(format!("Robot with ID {robot_id} does not exist.")),
            }
        };

        let runtime =
            RobotRuntimeConfig::resolve(&robot, proxy.as_deref()).map_err(|e| e.to_string())?;
        let sender = build_sender(runtime).map_err(|e| e.to_string())?;
        senders.insert(robot_id.to_string(), Arc::clone(&sender));
        Ok(sender)
    }
}
