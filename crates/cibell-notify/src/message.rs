//! Platform-neutral description of one notification.

use std::collections::BTreeSet;

use cibell_common::types::BuildStatus;
use serde::{Deserialize, Serialize};

use crate::utils::is_mobile;
use crate::{MessageSender, SendResult};

/// Title rendered when a message carries none; a blank title must never
/// reach the wire.
pub const DEFAULT_TITLE: &str = "\u{1F4E2} CI Build Notification";

/// Message kinds understood by the dispatcher.
///
/// Each kind maps to exactly one [`MessageSender`] operation; the mapping
/// lives in [`MsgType::dispatch`] so callers never match on the kind
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    Text,
    Image,
    ShareChat,
    Post,
    Link,
    Markdown,
    Card,
}

impl MsgType {
    /// Routes the message to the sender operation for this kind.
    ///
    /// A platform that does not support the kind reports failure through
    /// the sender's default implementation; this method never panics.
    pub async fn dispatch(self, sender: &dyn MessageSender, msg: &MessageModel) -> SendResult {
        match self {
            MsgType::Text => sender.send_text(msg).await,
            MsgType::Image => sender.send_image(msg).await,
            MsgType::ShareChat => sender.send_share_chat(msg).await,
            MsgType::Post => sender.send_post(msg).await,
            MsgType::Link => sender.send_link(msg).await,
            MsgType::Markdown => sender.send_markdown(msg).await,
            MsgType::Card => sender.send_card(msg).await,
        }
    }
}

impl std::fmt::Display for MsgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MsgType::Text => "text",
            MsgType::Image => "image",
            MsgType::ShareChat => "share_chat",
            MsgType::Post => "post",
            MsgType::Link => "link",
            MsgType::Markdown => "markdown",
            MsgType::Card => "card",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for MsgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(MsgType::Text),
            "image" => Ok(MsgType::Image),
            "share_chat" => Ok(MsgType::ShareChat),
            "post" => Ok(MsgType::Post),
            "link" => Ok(MsgType::Link),
            "markdown" => Ok(MsgType::Markdown),
            "card" => Ok(MsgType::Card),
            _ => Err(format!("unknown message type: {s}")),
        }
    }
}

/// Resolved @mention targets, split into open ids and mobile numbers.
#[derive(Debug, Clone, Default)]
pub struct At {
    pub at_all: bool,
    pub user_ids: Vec<String>,
    pub mobiles: Vec<String>,
}

impl At {
    /// Every mentioned identifier: open ids first, then mobiles.
    pub fn all(&self) -> Vec<&str> {
        self.user_ids
            .iter()
            .chain(self.mobiles.iter())
            .map(String::as_str)
            .collect()
    }
}

/// An interactive button rendered inside a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonModel {
    pub text: String,
    pub url: String,
    /// Platform button style; blank falls back to the platform default.
    #[serde(default)]
    pub style: Option<String>,
}

impl ButtonModel {
    pub fn new(text: impl Into<String>, url: impl Into<String>, style: Option<&str>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            style: style.map(str::to_string),
        }
    }
}

/// An image placed above or below a card body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImgModel {
    /// Upload key referencing the image on the platform.
    pub img_key: String,
    /// Display mode: crop_center, fit_horizontal, custom_width, compact_width.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub compact_width: Option<bool>,
    /// Maximum display width in pixels, honored in custom_width mode.
    #[serde(default)]
    pub custom_width: Option<i64>,
    /// Hover text shown over the image.
    #[serde(default)]
    pub alt_content: Option<String>,
}

/// One notification instance, independent of any target platform.
///
/// The semantics of `text` depend on `msg_type`: raw text, markdown, an
/// image upload key, a chat id, or a JSON-encoded rich-text document.
#[derive(Debug, Clone, Default)]
pub struct MessageModel {
    /// Message kind; the dispatcher rejects a model without one before
    /// building any payload.
    pub msg_type: Option<MsgType>,
    /// Build status driving the card header color.
    pub status: Option<BuildStatus>,
    pub title: String,
    pub text: String,
    /// Mention everyone in the target chat.
    pub at_all: bool,
    /// Raw mention targets; deduplicated here, trimmed and partitioned
    /// into ids vs mobiles when projected through [`MessageModel::at`].
    pub at_user_ids: BTreeSet<String>,
    pub buttons: Vec<ButtonModel>,
    pub top_img: Option<ImgModel>,
    pub bottom_img: Option<ImgModel>,

    // DingTalk-specific fields.
    /// Target URL of a link message.
    pub message_url: Option<String>,
    /// Preview image URL of a link message.
    pub pic_url: Option<String>,
    /// Single-button title; when set, the card's button list is ignored.
    pub single_title: Option<String>,
    /// Single-button target URL.
    pub single_url: Option<String>,
    /// Button layout: "0" vertical, "1" horizontal.
    pub btn_orientation: Option<String>,
}

impl MessageModel {
    pub fn new(msg_type: MsgType) -> Self {
        Self {
            msg_type: Some(msg_type),
            ..Self::default()
        }
    }

    /// Title as rendered on the wire; blank titles fall back to
    /// [`DEFAULT_TITLE`].
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    /// Card header color template; messages without a build status use
    /// the Start template.
    pub fn header_template(&self) -> &'static str {
        self.status.unwrap_or(BuildStatus::Start).template()
    }

    /// Projects the raw mention set into an [`At`]: entries are trimmed,
    /// blanks dropped, and mobile numbers split from open ids.
    pub fn at(&self) -> At {
        let mut at = At {
            at_all: self.at_all,
            ..At::default()
        };
        for id in &self.at_user_ids {
            let id = id.trim();
            if id.is_empty() {
                continue;
            }
            if is_mobile(id) {
                at.mobiles.push(id.to_string());
            } else {
                at.user_ids.push(id.to_string());
            }
        }
        at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_ids(ids: &[&str]) -> MessageModel {
        let mut msg = MessageModel::new(MsgType::Text);
        msg.at_user_ids = ids.iter().map(|s| s.to_string()).collect();
        msg
    }

    #[test]
    fn at_partitions_mobiles_from_ids() {
        let at = model_with_ids(&["ou_abc", "13812345678", "  ", "ou_def"]).at();
        assert_eq!(at.user_ids, vec!["ou_abc", "ou_def"]);
        assert_eq!(at.mobiles, vec!["13812345678"]);
        assert_eq!(at.all(), vec!["ou_abc", "ou_def", "13812345678"]);
    }

    #[test]
    fn at_trims_entries() {
        let at = model_with_ids(&[" ou_abc "]).at();
        assert_eq!(at.user_ids, vec!["ou_abc"]);
    }

    #[test]
    fn blank_title_uses_default() {
        let mut msg = MessageModel::new(MsgType::Text);
        assert_eq!(msg.display_title(), DEFAULT_TITLE);
        msg.title = "  ".to_string();
        assert_eq!(msg.display_title(), DEFAULT_TITLE);
        msg.title = "Build #42".to_string();
        assert_eq!(msg.display_title(), "Build #42");
    }

    #[test]
    fn header_template_defaults_to_start() {
        use cibell_common::types::BuildStatus;

        let mut msg = MessageModel::new(MsgType::Card);
        assert_eq!(msg.header_template(), "blue");
        msg.status = Some(BuildStatus::Failure);
        assert_eq!(msg.header_template(), "red");
    }
}
