//! Utility helpers shared by the senders and payload builders.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::message::ButtonModel;
use crate::robot::{PolicyKind, SecurityPolicy};

/// Maximum number of bytes of a request/response body echoed to logs.
pub const MAX_BODY_LENGTH: usize = 4000;

/// Mainland-China mobile number: optional 0/86/+86 prefix, then 1[3-9]
/// and nine more digits.
static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0|86|\+86)?1[3-9]\d{9}$").expect("valid mobile pattern"));

/// True when the value looks like a mobile number rather than an open id.
pub fn is_mobile(value: &str) -> bool {
    MOBILE.is_match(value)
}

/// Appends the robot's registered keyword so the platform's keyword
/// policy accepts the message.
pub fn add_keyword(text: &str, keyword: Option<&str>) -> String {
    match keyword {
        Some(keyword) if !keyword.is_empty() => format!("{text} {keyword}"),
        _ => text.to_string(),
    }
}

/// Truncates a string to at most `max_len` bytes, snapping to a char
/// boundary so multi-byte characters are never split.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}

/// Returns the robot's security policies with secret values masked, for
/// safe logging.
pub fn redacted_policies(policies: &[SecurityPolicy]) -> Value {
    Value::Array(
        policies
            .iter()
            .map(|p| {
                let value = if p.policy == PolicyKind::Secret {
                    "***"
                } else {
                    p.value.as_str()
                };
                serde_json::json!({ "policy": p.policy, "value": value })
            })
            .collect(),
    )
}

/// Default buttons for a CI job page: change log and console output.
pub fn default_buttons(job_url: &str) -> Vec<ButtonModel> {
    vec![
        ButtonModel::new("Changes", format!("{job_url}changes"), Some("primary")),
        ButtonModel::new("Console", format!("{job_url}console"), Some("default")),
    ]
}
