//! Robot configuration and platform resolution.

use cibell_common::id;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, Result};

/// Chat platforms reachable through an outgoing webhook.
///
/// The kind is derived from the webhook host, never configured directly;
/// a host outside the known table makes the robot invalid for sending.
///
/// # Examples
///
/// ```
/// use cibell_notify::robot::RobotKind;
///
/// let kind = RobotKind::from_webhook("https://open.feishu.cn/open-apis/bot/v2/hook/x");
/// assert_eq!(kind, Some(RobotKind::Feishu));
/// assert_eq!(RobotKind::from_webhook("https://example.com/hook"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotKind {
    Lark,
    Feishu,
    DingTalk,
}

impl RobotKind {
    /// Known webhook hosts. Matching is by substring because the
    /// platforms expose regional aliases (e.g. `oapi.dingtalk.com`).
    const HOSTS: [(&'static str, RobotKind); 3] = [
        ("open.larksuite.com", RobotKind::Lark),
        ("open.feishu.cn", RobotKind::Feishu),
        ("api.dingtalk.com", RobotKind::DingTalk),
    ];

    /// Resolves the platform from a webhook URL, or `None` when the host
    /// is unknown or the URL does not parse.
    pub fn from_webhook(webhook: &str) -> Option<RobotKind> {
        let url = Url::parse(webhook).ok()?;
        let host = url.host_str()?.to_string();
        Self::HOSTS
            .iter()
            .find(|(known, _)| host.contains(*known))
            .map(|(_, kind)| *kind)
    }

    /// True for the platforms sharing the Lark wire format.
    pub fn is_lark_family(self) -> bool {
        matches!(self, RobotKind::Lark | RobotKind::Feishu)
    }
}

impl std::fmt::Display for RobotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RobotKind::Lark => write!(f, "lark"),
            RobotKind::Feishu => write!(f, "feishu"),
            RobotKind::DingTalk => write!(f, "dingtalk"),
        }
    }
}

/// Security policy types a robot may carry; at most one effective value
/// per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// A literal keyword that must appear in every message body.
    Key,
    /// HMAC signing secret.
    Secret,
    /// Disable TLS certificate verification. Test targets only.
    NoSsl,
}

/// One configured security policy entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub policy: PolicyKind,
    pub value: String,
}

/// A configured delivery target: one webhook plus its security policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Stable identity; generated once when the configuration omits it.
    #[serde(default = "id::robot_id")]
    pub id: String,
    /// Display name, not used for routing.
    #[serde(default)]
    pub name: String,
    pub webhook: String,
    #[serde(default)]
    pub security_policies: Vec<SecurityPolicy>,
}

impl RobotConfig {
    /// The platform derived from the webhook host.
    pub fn kind(&self) -> Option<RobotKind> {
        RobotKind::from_webhook(&self.webhook)
    }

    /// Effective value for a policy type; later entries win and blank
    /// values count as absent.
    fn policy_value(&self, kind: PolicyKind) -> Option<&str> {
        self.security_policies
            .iter()
            .rev()
            .find(|p| p.policy == kind && !p.value.trim().is_empty())
            .map(|p| p.value.as_str())
    }
}

/// Resolved, sender-facing projection of a [`RobotConfig`].
///
/// Built fresh from the current configuration snapshot when the
/// dispatcher first needs a sender for the robot, and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct RobotRuntimeConfig {
    pub kind: RobotKind,
    pub webhook: String,
    /// Keyword required by the platform's keyword policy.
    pub keyword: Option<String>,
    /// HMAC signing secret.
    pub secret: Option<String>,
    /// Disable TLS verification; only honored for test targets.
    pub skip_tls_verify: bool,
    /// Proxy URL; absent means the system default.
    pub proxy: Option<String>,
}

impl RobotRuntimeConfig {
    /// Projects the stored configuration, resolving the platform from
    /// the webhook host.
    pub fn resolve(robot: &RobotConfig, proxy: Option<&str>) -> Result<Self> {
        let kind = robot
            .kind()
            .ok_or_else(|| NotifyError::UnknownPlatform(robot.webhook.clone()))?;
        Ok(Self {
            kind,
            webhook: robot.webhook.clone(),
            keyword: robot.policy_value(PolicyKind::Key).map(str::to_string),
            secret: robot.policy_value(PolicyKind::Secret).map(str::to_string),
            skip_tls_verify: robot
                .policy_value(PolicyKind::NoSsl)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            proxy: proxy.map(str::to_string),
        })
    }
}
