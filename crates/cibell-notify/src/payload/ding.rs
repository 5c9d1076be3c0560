//! DingTalk wire formats.

use serde::Serialize;

use crate::message::{At, MessageModel};
use crate::utils::add_keyword;

/// Mention block embedded in every DingTalk payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DingAt {
    pub at_mobiles: Vec<String>,
    pub at_user_ids: Vec<String>,
    pub is_at_all: bool,
}

impl From<&At> for DingAt {
    fn from(at: &At) -> Self {
        Self {
            at_mobiles: at.mobiles.clone(),
            at_user_ids: at.user_ids.clone(),
            is_at_all: at.at_all,
        }
    }
}

/// Applies @mention markup to a message body.
///
/// Ids and mobiles are joined into an `@`-prefixed, space-separated
/// list: appended directly for plain text, or wrapped in a colored font
/// tag after a blank line for markdown bodies. An empty mention set
/// returns the content unchanged; mention-everyone travels only in the
/// payload's `at` block.
pub fn add_at_info(content: &str, at: &At, markdown: bool) -> String {
    let all = at.all();
    if all.is_empty() {
        return content.to_string();
    }
    let at_content = format!("@{}", all.join(" @"));
    if markdown {
        format!("{content}\n\n<font color='#1890FF'>{at_content}</font>\n")
    } else {
        format!("{content}{at_content}")
    }
}

#[derive(Debug, Serialize)]
pub struct TextPayload {
    pub msgtype: &'static str,
    pub at: DingAt,
    pub text: TextContent,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    pub content: String,
}

/// Plain text: keyword suffix plus the trailing @mention list.
pub fn text(msg: &MessageModel, keyword: Option<&str>) -> TextPayload {
    let at = msg.at();
    let content = add_at_info(&add_keyword(&msg.text, keyword), &at, false);
    TextPayload {
        msgtype: "text",
        at: DingAt::from(&at),
        text: TextContent { content },
    }
}

#[derive(Debug, Serialize)]
pub struct MarkdownPayload {
    pub msgtype: &'static str,
    pub at: DingAt,
    pub markdown: MarkdownContent,
}

#[derive(Debug, Serialize)]
pub struct MarkdownContent {
    pub title: String,
    pub text: String,
}

/// Markdown body with the colored @mention block appended.
pub fn markdown(msg: &MessageModel, keyword: Option<&str>) -> MarkdownPayload {
    let at = msg.at();
    let text = add_at_info(&add_keyword(&msg.text, keyword), &at, true);
    MarkdownPayload {
        msgtype: "markdown",
        at: DingAt::from(&at),
        markdown: MarkdownContent {
            title: msg.display_title().to_string(),
            text,
        },
    }
}

#[derive(Debug, Serialize)]
pub struct LinkPayload {
    pub msgtype: &'static str,
    pub at: DingAt,
    pub link: LinkContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkContent {
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_url: Option<String>,
}

/// Link message: title, body, preview image and target URL.
pub fn link(msg: &MessageModel, keyword: Option<&str>) -> LinkPayload {
    let at = msg.at();
    LinkPayload {
        msgtype: "link",
        at: DingAt::from(&at),
        link: LinkContent {
            title: msg.display_title().to_string(),
            text: add_keyword(&msg.text, keyword),
            pic_url: msg.pic_url.clone(),
            message_url: msg.message_url.clone(),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct ActionCardPayload {
    pub msgtype: &'static str,
    pub at: DingAt,
    #[serde(rename = "actionCard")]
    pub action_card: ActionCardContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCardContent {
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btn_orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btns: Option<Vec<DingButton>>,
}

#[derive(Debug, Serialize)]
pub struct DingButton {
    pub title: String,
    #[serde(rename = "actionURL")]
    pub action_url: String,
}

/// Action card. A configured single-button title suppresses the button
/// list entirely and renders the whole card as one link; otherwise the
/// buttons are laid out per `btn_orientation` (horizontal by default).
pub fn action_card(msg: &MessageModel, keyword: Option<&str>) -> ActionCardPayload {
    let at = msg.at();
    let text = add_at_info(&add_keyword(&msg.text, keyword), &at, true);
    let single_title = msg
        .single_title
        .as_deref()
        .filter(|t| !t.trim().is_empty());

    let action_card = match single_title {
        Some(single_title) => ActionCardContent {
            title: msg.display_title().to_string(),
            text,
            single_title: Some(single_title.to_string()),
            single_url: msg.single_url.clone(),
            btn_orientation: None,
            btns: None,
        },
        None => {
            let btns = if msg.buttons.is_empty() {
                None
            } else {
                Some(
                    msg.buttons
                        .iter()
                        .map(|b| DingButton {
                            title: b.text.clone(),
                            action_url: b.url.clone(),
                        })
                        .collect(),
                )
            };
            let orientation = msg
                .btn_orientation
                .as_deref()
                .filter(|o| !o.trim().is_empty())
                .unwrap_or("1");
            ActionCardContent {
                title: msg.display_title().to_string(),
                text,
                single_title: None,
                single_url: None,
                btn_orientation: Some(orientation.to_string()),
                btns,
            }
        }
    };

    ActionCardPayload {
        msgtype: "actionCard",
        at: DingAt::from(&at),
        action_card,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ButtonModel, MsgType};

    fn model(body: &str) -> MessageModel {
        let mut msg = MessageModel::new(MsgType::Text);
        msg.text = body.to_string();
        msg
    }

    #[test]
    fn at_info_without_mentions_is_identity() {
        assert_eq!(add_at_info("build ok", &At::default(), false), "build ok");
        assert_eq!(add_at_info("build ok", &At::default(), true), "build ok");
    }

    #[test]
    fn plain_text_mentions_are_suffixed() {
        let at = At {
            at_all: false,
            user_ids: vec!["ou_a".to_string()],
            mobiles: vec!["13812345678".to_string()],
        };
        assert_eq!(
            add_at_info("build ok", &at, false),
            "build ok@ou_a @13812345678"
        );
    }

    #[test]
    fn markdown_mentions_use_font_tag() {
        let at = At {
            at_all: false,
            user_ids: vec!["ou_a".to_string()],
            mobiles: Vec::new(),
        };
        assert_eq!(
            add_at_info("build ok", &at, true),
            "build ok\n\n<font color='#1890FF'>@ou_a</font>\n"
        );
    }

    #[test]
    fn text_payload_embeds_at_block() {
        let mut msg = model("build ok");
        msg.at_all = true;
        let value = serde_json::to_value(&text(&msg, None)).unwrap();
        assert_eq!(value["msgtype"], "text");
        assert_eq!(value["at"]["isAtAll"], true);
        assert_eq!(value["text"]["content"], "build ok");
    }

    #[test]
    fn markdown_payload_applies_keyword_to_body() {
        let mut msg = model("build ok");
        msg.title = "Build #42".to_string();
        let value = serde_json::to_value(&markdown(&msg, Some("jenkins"))).unwrap();
        assert_eq!(value["msgtype"], "markdown");
        assert_eq!(value["markdown"]["title"], "Build #42");
        assert_eq!(value["markdown"]["text"], "build ok jenkins");
    }

    #[test]
    fn link_payload_carries_urls() {
        let mut msg = model("see details");
        msg.message_url = Some("https://ci/job/42".to_string());
        msg.pic_url = Some("https://ci/icon.png".to_string());
        let value = serde_json::to_value(&link(&msg, None)).unwrap();
        assert_eq!(value["msgtype"], "link");
        assert_eq!(value["link"]["messageUrl"], "https://ci/job/42");
        assert_eq!(value["link"]["picUrl"], "https://ci/icon.png");
    }

    #[test]
    fn single_button_suppresses_button_list() {
        let mut msg = model("build ok");
        msg.single_title = Some("Open job".to_string());
        msg.single_url = Some("https://ci/job/42".to_string());
        msg.buttons = vec![ButtonModel::new("Console", "https://ci/console", None)];
        let value = serde_json::to_value(&action_card(&msg, None)).unwrap();
        assert_eq!(value["actionCard"]["singleTitle"], "Open job");
        assert_eq!(value["actionCard"]["singleUrl"], "https://ci/job/42");
        assert!(value["actionCard"].get("btns").is_none());
        assert!(value["actionCard"].get("btnOrientation").is_none());
    }

    #[test]
    fn multi_button_card_defaults_to_horizontal() {
        let mut msg = model("build ok");
        msg.buttons = vec![
            ButtonModel::new("Changes", "https://ci/changes", None),
            ButtonModel::new("Console", "https://ci/console", None),
        ];
        let value = serde_json::to_value(&action_card(&msg, None)).unwrap();
        assert_eq!(value["actionCard"]["btnOrientation"], "1");
        let btns = value["actionCard"]["btns"].as_array().unwrap();
        assert_eq!(btns.len(), 2);
        assert_eq!(btns[0]["title"], "Changes");
        assert_eq!(btns[0]["actionURL"], "https://ci/changes");
    }
}
