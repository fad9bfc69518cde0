//! Per-run counters.

use crate::domain::ResourceKind;

/// What one run did for one resource kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindReport {
    /// Retention groups found.
    pub groups: usize,
    /// Marker-tagged snapshots without a source, left untouched.
    pub ungroupable: usize,
    /// Snapshots deleted (or planned for deletion in a dry run).
    pub deleted: usize,
    /// Delete requests that failed.
    pub delete_failures: usize,
    /// Resources carrying the marker tag.
    pub eligible: usize,
    /// Snapshots requested (or planned in a dry run).
    pub created: usize,
    /// Create requests that failed.
    pub create_failures: usize,
    /// Eligible resources skipped because they were not `available`.
    pub skipped_unavailable: usize,
    /// Phases (prune or create) abandoned because a listing failed.
    pub aborted_phases: usize,
}

impl KindReport {
    /// Number of failed operations, including aborted phases.
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.delete_failures + self.create_failures + self.aborted_phases
    }
}

/// Counters for a full run over both kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Database instances.
    pub instances: KindReport,
    /// Database clusters.
    pub clusters: KindReport,
}

impl RunReport {
    /// Returns the counters for `kind`.
    #[must_use]
    pub const fn kind(&self, kind: ResourceKind) -> &KindReport {
        match kind {
            ResourceKind::Instance => &self.instances,
            ResourceKind::Cluster => &self.clusters,
        }
    }

    /// Returns mutable counters for `kind`.
    pub fn kind_mut(&mut self, kind: ResourceKind) -> &mut KindReport {
        match kind {
            ResourceKind::Instance => &mut self.instances,
            ResourceKind::Cluster => &mut self.clusters,
        }
    }

    /// Number of failed operations across both kinds.
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.instances.failures() + self.clusters.failures()
    }
}
