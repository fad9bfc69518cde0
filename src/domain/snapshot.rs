//! Point-in-time snapshots and their sortable names.

use chrono::{DateTime, Utc};

use super::{ResourceKind, Status};

/// An immutable point-in-time copy of a [`super::Resource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Instance snapshot or cluster snapshot.
    pub kind: ResourceKind,
    /// Unique snapshot identifier. Deletions address this, never the
    /// backup source.
    pub identifier: String,
    /// Resource the inventory says the snapshot was taken from. Informational
    /// only; grouping uses the marker tag.
    pub resource_identifier: Option<String>,
    /// Current status. Only available snapshots take part in retention.
    pub status: Status,
    /// Creation time. Absent while the snapshot is still being taken.
    pub created_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Creates a new `Snapshot`.
    #[must_use]
    pub fn new(
        kind: ResourceKind,
        identifier: impl Into<String>,
        status: Status,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            resource_identifier: None,
            status,
            created_at,
        }
    }

    /// Sets the resource identifier reported by the inventory.
    #[must_use]
    pub fn with_resource_identifier(mut self, resource_identifier: impl Into<String>) -> Self {
        self.resource_identifier = Some(resource_identifier.into());
        self
    }
}

/// Builds the identifier for a new snapshot of `resource_id` taken at `at`.
///
/// The suffix is the UTC ISO-8601 timestamp with `:`, `+` and `.` removed,
/// followed by `Z`, e.g. `orders-2024-03-01T041503123456Z`. Microseconds are
/// always rendered at fixed width, so names for one resource sort lexically
/// in creation order.
#[must_use]
pub fn snapshot_name(resource_id: &str, at: DateTime<Utc>) -> String {
    let stamp: String = at
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
        .chars()
        .filter(|c| !matches!(c, ':' | '+' | '.'))
        .collect();
    format!("{resource_id}-{stamp}Z")
}
