//! Lark interactive-card assembly.

use serde::Serialize;
use serde_json::{json, Value};

use crate::message::{ButtonModel, ImgModel};

/// Card behavior flags.
#[derive(Debug, Serialize)]
pub struct CardConfig {
    pub wide_screen_mode: bool,
    pub enable_forward: bool,
}

/// Tagged text content used for titles and markdown bodies.
#[derive(Debug, Serialize)]
pub struct TagContent {
    pub tag: &'static str,
    pub content: String,
}

/// Card header: color template plus plain-text title.
#[derive(Debug, Serialize)]
pub struct CardHeader {
    pub template: String,
    pub title: TagContent,
}

/// Interactive card root.
#[derive(Debug, Serialize)]
pub struct Card {
    pub config: CardConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    pub elements: Vec<Value>,
}

/// Assembles the card element list in display order: each content section
/// (image or markdown body) is preceded by a horizontal rule, and the
/// button row comes last.
pub struct CardBuilder {
    header: Option<CardHeader>,
    elements: Vec<Value>,
}

impl CardBuilder {
    pub fn new() -> Self {
        Self {
            header: None,
            elements: Vec::new(),
        }
    }

    pub fn header(mut self, template: &str, title: &str) -> Self {
        self.header = Some(CardHeader {
            template: template.to_string(),
            title: TagContent {
                tag: "plain_text",
                content: title.to_string(),
            },
        });
        self
    }

    /// Adds a separator followed by the image; a missing image adds
    /// nothing.
    pub fn image(mut self, img: Option<&ImgModel>) -> Self {
        if let Some(img) = img {
            self = self.separator();
            self.elements.push(img_element(img));
        }
        self
    }

    /// Adds a separator followed by the markdown body.
    pub fn markdown(mut self, content: &str) -> Self {
        self = self.separator();
        self.elements.push(json!({ "tag": "markdown", "content": content }));
        self
    }

    /// Adds a horizontal rule.
    pub fn separator(mut self) -> Self {
        self.elements.push(json!({ "tag": "hr" }));
        self
    }

    /// Adds the action block; an empty button list adds nothing.
    pub fn actions(mut self, buttons: &[ButtonModel]) -> Self {
        if !buttons.is_empty() {
            let actions: Vec<Value> = buttons.iter().map(button_element).collect();
            self.elements
                .push(json!({ "tag": "action", "actions": actions }));
        }
        self
    }

    pub fn build(self) -> Card {
        Card {
            config: CardConfig {
                wide_screen_mode: true,
                enable_forward: true,
            },
            header: self.header,
            elements: self.elements,
        }
    }
}

impl Default for CardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn button_element(button: &ButtonModel) -> Value {
    let style = button
        .style
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("primary");
    json!({
        "tag": "button",
        "text": { "tag": "plain_text", "content": button.text },
        "url": button.url,
        "type": style,
    })
}

#[derive(Debug, Serialize)]
struct ImgElement<'a> {
    tag: &'static str,
    img_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compact_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alt: Option<Alt<'a>>,
}

#[derive(Debug, Serialize)]
struct Alt<'a> {
    tag: &'static str,
    content: &'a str,
}

fn img_element(img: &ImgModel) -> Value {
    serde_json::to_value(ImgElement {
        tag: "img",
        img_key: &img.img_key,
        mode: img.mode.as_deref(),
        compact_width: img.compact_width,
        custom_width: img.custom_width,
        alt: img
            .alt_content
            .as_deref()
            .map(|content| Alt { tag: "plain_text", content }),
    })
    .expect("image element serializes to json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(card: &Card) -> Vec<String> {
        card.elements
            .iter()
            .map(|e| e["tag"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn markdown_only_card_layout() {
        let card = CardBuilder::new()
            .header("blue", "Build #42")
            .markdown("all green")
            .separator()
            .actions(&[])
            .build();
        assert_eq!(tags(&card), vec!["hr", "markdown", "hr"]);
        assert_eq!(card.header.as_ref().unwrap().template, "blue");
        assert!(card.config.wide_screen_mode);
    }

    #[test]
    fn images_and_buttons_keep_display_order() {
        let top = ImgModel {
            img_key: "img_top".to_string(),
            ..ImgModel::default()
        };
        let bottom = ImgModel {
            img_key: "img_bottom".to_string(),
            ..ImgModel::default()
        };
        let buttons = vec![ButtonModel::new("Console", "https://ci/console", None)];
        let card = CardBuilder::new()
            .header("green", "Build #42")
            .image(Some(&top))
            .markdown("all green")
            .image(Some(&bottom))
            .separator()
            .actions(&buttons)
            .build();
        assert_eq!(
            tags(&card),
            vec!["hr", "img", "hr", "markdown", "hr", "img", "hr", "action"]
        );
    }

    #[test]
    fn button_style_defaults_to_primary() {
        let value = button_element(&ButtonModel::new("Go", "https://ci", None));
        assert_eq!(value["type"], "primary");
        assert_eq!(value["text"]["content"], "Go");

        let styled = button_element(&ButtonModel::new("Go", "https://ci", Some("danger")));
        assert_eq!(styled["type"], "danger");
    }

    #[test]
    fn img_element_skips_absent_fields() {
        let img = ImgModel {
            img_key: "img_abc".to_string(),
            mode: Some("fit_horizontal".to_string()),
            alt_content: Some("screenshot".to_string()),
            ..ImgModel::default()
        };
        let value = img_element(&img);
        assert_eq!(value["tag"], "img");
        assert_eq!(value["img_key"], "img_abc");
        assert_eq!(value["mode"], "fit_horizontal");
        assert_eq!(value["alt"]["content"], "screenshot");
        assert!(value.get("custom_width").is_none());
        assert!(value.get("compact_width").is_none());
    }
}
