//! Database instances and clusters as listed by the inventory.

use super::{ResourceKind, Status};

/// A database instance or cluster.
///
/// Owned entirely by the database service; this crate only reads it. Tags
/// are not part of the listing and are fetched separately through the
/// resource's constructed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Instance or cluster.
    pub kind: ResourceKind,
    /// Unique identifier within the account and region.
    pub identifier: String,
    /// Current operational status.
    pub status: Status,
}

impl Resource {
    /// Creates a new `Resource`.
    #[must_use]
    pub fn new(kind: ResourceKind, identifier: impl Into<String>, status: Status) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            status,
        }
    }
}
