//! Lark-family sender: the signature is embedded in the JSON body.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::message::MessageModel;
use crate::payload::lark;
use crate::robot::RobotRuntimeConfig;
use crate::sign::lark_sign;
use crate::transport::post_json;
use crate::{MessageSender, SendResult};

pub struct LarkSender {
    runtime: RobotRuntimeConfig,
    client: Client,
}

impl LarkSender {
    pub fn new(runtime: RobotRuntimeConfig, client: Client) -> Self {
        Self { runtime, client }
    }

    fn keyword(&self) -> Option<&str> {
        self.runtime.keyword.as_deref()
    }

    /// Serializes the payload, injecting `timestamp` and `sign` as
    /// top-level fields when a signing secret is configured.
    fn sign_to_json<T: Serialize>(&self, payload: &T) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(payload)?;
        if let (Some(secret), Value::Object(obj)) = (self.runtime.secret.as_deref(), &mut value) {
            let timestamp = Utc::now().timestamp();
            obj.insert(
                "timestamp".to_string(),
                Value::String(timestamp.to_string()),
            );
            obj.insert(
                "sign".to_string(),
                Value::String(lark_sign(timestamp, secret)),
            );
        }
        serde_json::to_string(&value)
    }

    async fn send_payload<T: Serialize>(&self, payload: &T) -> SendResult {
        let body = match self.sign_to_json(payload) {
            Ok(body) => body,
            Err(e) => return SendResult::fail(format!("failed to serialize payload: {e}")),
        };
        post_json(&self.client, &self.runtime.webhook, body, &[]).await
    }
}

#[async_trait]
impl MessageSender for LarkSender {
    async fn send_text(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&lark::text(msg, self.keyword())).await
    }

    async fn send_markdown(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&lark::markdown(msg, self.keyword())).await
    }

    async fn send_image(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&lark::image(msg)).await
    }

    async fn send_share_chat(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&lark::share_chat(msg)).await
    }

    async fn send_post(&self, msg: &MessageModel) -> SendResult {
        self.send_payload(&lark::post(msg, self.keyword())).await
    }

    async fn send_card(&self, msg: &MessageModel) -> SendResult {
        if let Some(raw) = lark::raw_card(msg) {
            return self.send_payload(&raw).await;
        }
        self.send_payload(&lark::card(msg, self.keyword())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MsgType;
    use crate::robot::RobotKind;

    fn sender(secret: Option<&str>) -> LarkSender {
        LarkSender::new(
            RobotRuntimeConfig {
                kind: RobotKind::Feishu,
                webhook: "https://open.feishu.cn/open-apis/bot/v2/hook/x".to_string(),
                keyword: None,
                secret: secret.map(str::to_string),
                skip_tls_verify: false,
                proxy: None,
            },
            Client::new(),
        )
    }

    #[test]
    fn unsigned_payload_has_no_signature_fields() {
        let mut msg = MessageModel::new(MsgType::Text);
        msg.text = "build ok".to_string();
        let body = sender(None)
            .sign_to_json(&lark::text(&msg, None))
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value.get("sign").is_none());
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn signed_payload_gains_timestamp_and_sign() {
        let mut msg = MessageModel::new(MsgType::Text);
        msg.text = "build ok".to_string();
        let body = sender(Some("abc"))
            .sign_to_json(&lark::text(&msg, None))
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value["timestamp"].is_string());
        assert!(!value["sign"].as_str().unwrap().is_empty());
        // the payload itself is untouched
        assert_eq!(value["msg_type"], "text");
        assert_eq!(value["content"]["text"], "build ok");
    }
}
