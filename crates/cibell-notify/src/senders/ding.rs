//! DingTalk sender: the signature travels on the webhook URL.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

use crate::message::MessageModel;
use crate::payload::ding;
use crate::robot::RobotRuntimeConfig;
use crate::sign::{ding_sign, ding_signed_url};
use crate::transport::post_json;
use crate::{MessageSender, SendResult};

pub struct DingSender {
    runtime: RobotRuntimeConfig,
    client: Client,
}

impl DingSender {
    pub fn new(runtime: RobotRuntimeConfig, client: Client) -> Self {
        Self { runtime, client }
    }

    fn keyword(&self) -> Option<&str> {
        self.runtime.keyword.as_deref()
    }

    /// Request target and extra headers for one send. With a secret
    /// configured, `timestamp`/`sign` are appended as query parameters
    /// and mirrored as headers; without one the webhook is used as-is.
    pub(crate) fn signed_request(&self) -> (String, Vec<(String, String)>) {
        let Some(secret) = self.runtime.secret.as_deref() else {
            return (self.runtime.webhook.clone(), Vec::new());
        };
        let timestamp = Utc::now().timestamp_millis();
        let url = ding_signed_url(&self.runtime.webhook, timestamp, secret);
        let headers = vec![
            ("timestamp".to_string(), timestamp.to_string()),
            ("sign".to_string(), ding_sign(timestamp, secret)),
        ];
        (url, headers)
    }

    async fn send_payload<T: Serialize>(&self, payload: &T) -> SendResult {
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => return SendResult::fail(format!("failed to serialize payload: {e}")),
        };
        let (url, headers) = self.signed_request();
        post_json(&self.client, &url, body, &headers).await
    }
}

#[async_trait]
impl MessageSender for DingSender {
    async fn send_text(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&ding::text(msg, self.keyword())).await
    }

    async fn send_markdown(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&ding::markdown(msg, self.keyword())).await
    }

    async fn send_link(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&ding::link(msg, self.keyword())).await
    }

    async fn send_card(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&ding::action_card(msg, self.keyword()))
            .await
    }
}
