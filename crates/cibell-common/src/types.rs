use serde::{Deserialize, Serialize};

/// Build lifecycle status carried by a notification.
///
/// Each status maps to a display label, a generic color name, and the
/// card header color template used by the chat platforms.
///
/// # Examples
///
/// ```
/// use cibell_common::types::BuildStatus;
///
/// let status: BuildStatus = "failure".parse().unwrap();
/// assert_eq!(status, BuildStatus::Failure);
/// assert_eq!(status.template(), "red");
/// assert_eq!(status.to_string(), "failure");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Start,
    Success,
    Failure,
    Aborted,
    Unstable,
    NotBuilt,
    Unknown,
}

impl BuildStatus {
    /// Human-readable label for notification bodies.
    pub fn label(&self) -> &'static str {
        match self {
            BuildStatus::Start => "Started",
            BuildStatus::Success => "Succeeded",
            BuildStatus::Failure => "Failed",
            BuildStatus::Aborted => "Aborted",
            BuildStatus::Unstable => "Unstable",
            BuildStatus::NotBuilt => "Not built",
            BuildStatus::Unknown => "Unknown",
        }
    }

    /// Generic color name for UI representation.
    pub fn color(&self) -> &'static str {
        match self {
            BuildStatus::Start => "blue",
            BuildStatus::Success => "green",
            BuildStatus::Failure => "red",
            BuildStatus::Aborted => "neutral",
            BuildStatus::Unstable => "yellow",
            BuildStatus::NotBuilt => "turquoise",
            BuildStatus::Unknown => "purple",
        }
    }

    /// Card header color template understood by the chat platforms.
    pub fn template(&self) -> &'static str {
        match self {
            BuildStatus::Start => "blue",
            BuildStatus::Success => "green",
            BuildStatus::Failure => "red",
            BuildStatus::Aborted => "grey",
            BuildStatus::Unstable => "yellow",
            BuildStatus::NotBuilt => "turquoise",
            BuildStatus::Unknown => "purple",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Start => write!(f, "start"),
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Failure => write!(f, "failure"),
            BuildStatus::Aborted => write!(f, "aborted"),
            BuildStatus::Unstable => write!(f, "unstable"),
            BuildStatus::NotBuilt => write!(f, "not_built"),
            BuildStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for BuildStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(BuildStatus::Start),
            "success" => Ok(BuildStatus::Success),
            "failure" => Ok(BuildStatus::Failure),
            "aborted" => Ok(BuildStatus::Aborted),
            "unstable" => Ok(BuildStatus::Unstable),
            "not_built" => Ok(BuildStatus::NotBuilt),
            "unknown" => Ok(BuildStatus::Unknown),
            _ => Err(format!("unknown build status: {s}")),
        }
    }
}
