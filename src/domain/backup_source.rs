//! Retention grouping key.
//!
//! [`BackupSource`] is a newtype over the resource identifier recovered from
//! a snapshot's marker-tag value, so that grouping keys cannot be confused
//! with snapshot identifiers.

use std::fmt;

/// Identifier of the resource a snapshot was taken from.
///
/// Recovered from the marker-tag *value* on the snapshot, never from the
/// snapshot's own identifier. Always non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackupSource(String);

impl BackupSource {
    /// Creates a `BackupSource` from a marker-tag value.
    ///
    /// Returns `None` for an empty or whitespace-only value; such snapshots
    /// cannot be attributed to a resource. Any other value is kept exactly
    /// as tagged, so `" orders"` and `"orders"` are different sources.
    #[must_use]
    pub fn from_tag_value(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// Returns the source resource identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
