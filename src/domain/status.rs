//! Operational status shared by resources and snapshots.

use std::fmt;

/// Lifecycle status reported by the inventory for a resource or snapshot.
///
/// Only [`Status::Available`] is actionable: available resources are backed
/// up and available snapshots are classified and may be pruned. Statuses
/// this crate does not name are preserved verbatim in [`Status::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// Ready for use.
    Available,
    /// Being created (in-progress snapshot or provisioning resource).
    Creating,
    /// Being deleted.
    Deleting,
    /// Stopped by the operator.
    Stopped,
    /// Creation or operation failed.
    Failed,
    /// Any other status string, kept as reported.
    Other(String),
}

impl Status {
    /// Parses a status string as returned by the inventory API.
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "available" => Self::Available,
            "creating" => Self::Creating,
            "deleting" => Self::Deleting,
            "stopped" => Self::Stopped,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the API string for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::Creating => "creating",
            Self::Deleting => "deleting",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }

    /// Returns `true` only for [`Status::Available`].
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse() {
        assert_eq!(Status::from_api("available"), Status::Available);
        assert_eq!(Status::from_api("creating"), Status::Creating);
        assert_eq!(Status::from_api("stopped"), Status::Stopped);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = Status::from_api("backing-up");
        assert_eq!(status, Status::Other("backing-up".to_string()));
        assert_eq!(status.as_str(), "backing-up");
        assert!(!status.is_available());
    }

    #[test]
    fn only_available_is_available() {
        assert!(Status::Available.is_available());
        assert!(!Status::Creating.is_available());
        assert!(!Status::Failed.is_available());
    }
}
