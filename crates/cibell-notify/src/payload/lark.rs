//! Lark-family wire formats, shared by Lark and Feishu.

use serde::Serialize;
use serde_json::Value;

use crate::message::{At, MessageModel};
use crate::payload::card::{Card, CardBuilder};
use crate::utils::add_keyword;

fn at_token(id: &str) -> String {
    format!("<at id={id}></at>")
}

/// Applies @mention markup to a message body.
///
/// Mention-everyone appends the `all` token directly. Otherwise the
/// mentioned open ids are appended as a token list on their own line
/// (mobiles have no inline representation here). An empty mention set
/// returns the content unchanged.
pub fn add_at_info(content: &str, at: &At) -> String {
    if at.at_all {
        return format!("{content}{}", at_token("all"));
    }
    if at.user_ids.is_empty() {
        return content.to_string();
    }
    let tokens: String = at.user_ids.iter().map(|id| at_token(id)).collect();
    if content.ends_with('\n') {
        format!("{content}{tokens}")
    } else {
        format!("{content}\n{tokens}")
    }
}

#[derive(Debug, Serialize)]
pub struct TextPayload {
    pub msg_type: &'static str,
    pub content: TextContent,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    pub text: String,
}

/// Plain text: keyword suffix plus inline @mention tokens.
pub fn text(msg: &MessageModel, keyword: Option<&str>) -> TextPayload {
    let body = add_keyword(&msg.text, keyword);
    TextPayload {
        msg_type: "text",
        content: TextContent {
            text: add_at_info(&body, &msg.at()),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct ImagePayload {
    pub msg_type: &'static str,
    pub content: ImageContent,
}

#[derive(Debug, Serialize)]
pub struct ImageContent {
    pub image_key: String,
}

/// Image message; the model's text carries the upload key.
pub fn image(msg: &MessageModel) -> ImagePayload {
    ImagePayload {
        msg_type: "image",
        content: ImageContent {
            image_key: msg.text.clone(),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct ShareChatPayload {
    pub msg_type: &'static str,
    pub content: ShareChatContent,
}

#[derive(Debug, Serialize)]
pub struct ShareChatContent {
    pub share_chat_id: String,
}

/// Share-chat message; the model's text carries the chat id.
pub fn share_chat(msg: &MessageModel) -> ShareChatPayload {
    ShareChatPayload {
        msg_type: "share_chat",
        content: ShareChatContent {
            share_chat_id: msg.text.clone(),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct PostPayload {
    pub msg_type: &'static str,
    pub content: PostContent,
}

#[derive(Debug, Serialize)]
pub struct PostContent {
    pub post: RichText,
}

#[derive(Debug, Serialize)]
pub struct RichText {
    pub zh_cn: PostBody,
}

#[derive(Debug, Serialize)]
pub struct PostBody {
    pub title: String,
    pub content: Value,
}

/// Rich text: the caller supplies an already-structured JSON document in
/// the model's text; it is nested under the locale key without
/// interpretation.
pub fn post(msg: &MessageModel, keyword: Option<&str>) -> PostPayload {
    let title = add_keyword(msg.display_title(), keyword);
    let content = serde_json::from_str(&msg.text).unwrap_or(Value::Null);
    PostPayload {
        msg_type: "post",
        content: PostContent {
            post: RichText {
                zh_cn: PostBody { title, content },
            },
        },
    }
}

#[derive(Debug, Serialize)]
pub struct CardPayload {
    pub msg_type: &'static str,
    pub card: Card,
}

/// Markdown renders as a card: status-colored header, the markdown body
/// with @mention markup, and any buttons.
pub fn markdown(msg: &MessageModel, keyword: Option<&str>) -> CardPayload {
    let title = add_keyword(msg.display_title(), keyword);
    let body = add_at_info(&msg.text, &msg.at());
    let card = CardBuilder::new()
        .header(msg.header_template(), &title)
        .markdown(&body)
        .separator()
        .actions(&msg.buttons)
        .build();
    CardPayload {
        msg_type: "interactive",
        card,
    }
}

/// Full card: optional images above and below the markdown body.
pub fn card(msg: &MessageModel, keyword: Option<&str>) -> CardPayload {
    let title = add_keyword(msg.display_title(), keyword);
    let body = add_at_info(&msg.text, &msg.at());
    let card = CardBuilder::new()
        .header(msg.header_template(), &title)
        .image(msg.top_img.as_ref())
        .markdown(&body)
        .image(msg.bottom_img.as_ref())
        .separator()
        .actions(&msg.buttons)
        .build();
    CardPayload {
        msg_type: "interactive",
        card,
    }
}

/// Passthrough for messages whose text is already a JSON card document
/// (an object with an `elements` array): the document is sent as the
/// card body directly, with the header template filled in from the build
/// status when the supplied header lacks one.
pub fn raw_card(msg: &MessageModel) -> Option<Value> {
    let mut card: Value = serde_json::from_str(&msg.text).ok()?;
    if !card.get("elements").map_or(false, Value::is_array) {
        return None;
    }
    if let Some(header) = card.get_mut("header").and_then(Value::as_object_mut) {
        let blank = header
            .get("template")
            .and_then(Value::as_str)
            .map_or(true, |t| t.trim().is_empty());
        if blank {
            header.insert(
                "template".to_string(),
                Value::String(msg.header_template().to_string()),
            );
        }
    }
    Some(serde_json::json!({ "msg_type": "interactive", "card": card }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MsgType;

    fn text_model(body: &str) -> MessageModel {
        let mut msg = MessageModel::new(MsgType::Text);
        msg.text = body.to_string();
        msg
    }

    #[test]
    fn at_info_without_mentions_is_identity() {
        let at = At::default();
        assert_eq!(add_at_info("build ok", &at), "build ok");
    }

    #[test]
    fn at_all_appends_everyone_token() {
        let at = At {
            at_all: true,
            user_ids: vec!["ou_abc".to_string()],
            mobiles: Vec::new(),
        };
        assert_eq!(add_at_info("build ok", &at), "build ok<at id=all></at>");
    }

    #[test]
    fn at_user_ids_append_on_their_own_line() {
        let at = At {
            at_all: false,
            user_ids: vec!["ou_a".to_string(), "ou_b".to_string()],
            mobiles: Vec::new(),
        };
        assert_eq!(
            add_at_info("build ok", &at),
            "build ok\n<at id=ou_a></at><at id=ou_b></at>"
        );
        // body already ending in a newline gains no extra one
        assert_eq!(
            add_at_info("build ok\n", &at),
            "build ok\n<at id=ou_a></at><at id=ou_b></at>"
        );
    }

    #[test]
    fn text_payload_appends_keyword() {
        let payload = text(&text_model("build ok"), Some("jenkins"));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["msg_type"], "text");
        assert_eq!(value["content"]["text"], "build ok jenkins");
    }

    #[test]
    fn image_payload_carries_upload_key() {
        let payload = image(&text_model("img_v2_abc"));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["msg_type"], "image");
        assert_eq!(value["content"]["image_key"], "img_v2_abc");
    }

    #[test]
    fn post_payload_nests_content_under_locale() {
        let mut msg = text_model(r#"[[{"tag":"text","text":"done"}]]"#);
        msg.title = "Build".to_string();
        let value = serde_json::to_value(&post(&msg, None)).unwrap();
        assert_eq!(value["msg_type"], "post");
        assert_eq!(value["content"]["post"]["zh_cn"]["title"], "Build");
        assert!(value["content"]["post"]["zh_cn"]["content"].is_array());
    }

    #[test]
    fn raw_card_requires_elements() {
        assert!(raw_card(&text_model("not json")).is_none());
        assert!(raw_card(&text_model(r#"{"header":{}}"#)).is_none());

        let msg = text_model(r#"{"header":{"template":""},"elements":[]}"#);
        let value = raw_card(&msg).unwrap();
        assert_eq!(value["msg_type"], "interactive");
        assert_eq!(value["card"]["header"]["template"], "blue");
    }

    #[test]
    fn raw_card_keeps_explicit_template() {
        let msg = text_model(r#"{"header":{"template":"red"},"elements":[]}"#);
        let value = raw_card(&msg).unwrap();
        assert_eq!(value["card"]["header"]["template"], "red");
    }
}
