/// Errors raised while loading configuration or constructing a sender.
///
/// The send path itself never surfaces these: every delivery outcome,
/// including transport failures, is folded into a
/// [`SendResult`](crate::SendResult) value.
///
/// # Examples
///
/// ```
/// use cibell_notify::error::NotifyError;
///
/// let err = NotifyError::InvalidConfig("missing webhook".to_string());
/// assert!(err.to_string().contains("webhook"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Robot configuration is missing a required field or contains an
    /// invalid value.
    #[error("invalid robot configuration: {0}")]
    InvalidConfig(String),

    /// The webhook host does not belong to any supported chat platform.
    #[error("unknown robot platform for webhook '{0}'")]
    UnknownPlatform(String),

    /// Building the HTTP client failed (e.g. malformed proxy URL).
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a configuration file failed.
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a TOML configuration failed.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` alias for configuration and construction paths.
pub type Result<T> = std::result::Result<T, NotifyError>;
