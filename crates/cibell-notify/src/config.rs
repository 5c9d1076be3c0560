//! TOML-backed robot configuration.
//!
//! The dispatcher receives a [`NotifyConfig`] at construction and a
//! fresh one through
//! [`MessageDispatcher::reload`](crate::dispatcher::MessageDispatcher::reload)
//! whenever the robot list changes; nothing here is global state.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::robot::RobotConfig;

/// Proxy used for all webhook requests; absent means the system default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
}

/// The full notification configuration: an optional proxy plus the list
/// of registered robots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    #[serde(default)]
    pub robots: Vec<RobotConfig>,
}

impl NotifyConfig {
    /// Loads a TOML configuration file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Looks up a robot by id.
    pub fn robot(&self, id: &str) -> Option<&RobotConfig> {
        self.robots.iter().find(|r| r.id == id)
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy.as_ref().map(|p| p.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::PolicyKind;

    #[test]
    fn parses_full_config() {
        let config: NotifyConfig = toml::from_str(
            r#"
            [proxy]
            url = "http://proxy.internal:8080"

            [[robots]]
            id = "ops"
            name = "Ops channel"
            webhook = "https://open.feishu.cn/open-apis/bot/v2/hook/x"

            [[robots.security_policies]]
            policy = "key"
            value = "jenkins"

            [[robots.security_policies]]
            policy = "secret"
            value = "SECabc"
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy_url(), Some("http://proxy.internal:8080"));
        let robot = config.robot("ops").unwrap();
        assert_eq!(robot.name, "Ops channel");
        assert_eq!(robot.security_policies.len(), 2);
        assert_eq!(robot.security_policies[0].policy, PolicyKind::Key);
    }

    #[test]
    fn missing_id_gets_generated() {
        let config: NotifyConfig = toml::from_str(
            r#"
            [[robots]]
            webhook = "https://oapi.dingtalk.com/robot/send?access_token=t"
            "#,
        )
        .unwrap();
        assert!(!config.robots[0].id.is_empty());
    }

    #[test]
    fn empty_config_is_valid() {
        let config: NotifyConfig = toml::from_str("").unwrap();
        assert!(config.robots.is_empty());
        assert!(config.proxy.is_none());
    }
}
