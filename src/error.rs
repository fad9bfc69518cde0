//! Error types for configuration loading and inventory calls.
//!
//! [`ConfigError`] is always fatal and aborts the process before any remote
//! call. [`InventoryError`] describes one failed remote operation; the
//! backup driver logs and counts these per resource instead of aborting.

use std::path::PathBuf;

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file {} does not exist", .path.display())]
    Missing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("config file {} could not be read: {source}", .path.display())]
    Unreadable {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or lacks required keys.
    #[error("config file {} is malformed: {source}", .path.display())]
    Malformed {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A required value is present but unusable.
    #[error("invalid config value for {key}: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// A single inventory API call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed for {target}: {message}")]
pub struct InventoryError {
    /// Name of the failed operation (e.g. `"delete_snapshot"`).
    pub operation: &'static str,
    /// Resource, snapshot, or listing the call was about.
    pub target: String,
    /// Error detail reported by the service.
    pub message: String,
}

impl InventoryError {
    /// Creates a new `InventoryError`.
    #[must_use]
    pub fn new(
        operation: &'static str,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            target: target.into(),
            message: message.into(),
        }
    }
}
