//! Resource kinds handled by the two backup pipelines.

use std::fmt;

/// The two kinds of backable database resources.
///
/// Each kind has its own listing, snapshot, and identifier conventions but
/// both share one retention algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// A single database instance.
    Instance,
    /// A clustered database.
    Cluster,
}

impl ResourceKind {
    /// Every kind, in the order a run processes them.
    pub const ALL: [Self; 2] = [Self::Instance, Self::Cluster];

    /// Identifier segment for the resource itself (`db` / `cluster`).
    #[must_use]
    pub const fn resource_segment(self) -> &'static str {
        match self {
            Self::Instance => "db",
            Self::Cluster => "cluster",
        }
    }

    /// Identifier segment for snapshots of this kind
    /// (`snapshot` / `cluster-snapshot`).
    #[must_use]
    pub const fn snapshot_segment(self) -> &'static str {
        match self {
            Self::Instance => "snapshot",
            Self::Cluster => "cluster-snapshot",
        }
    }

    /// Human-readable label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Cluster => "cluster",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_match_arn_conventions() {
        assert_eq!(ResourceKind::Instance.resource_segment(), "db");
        assert_eq!(ResourceKind::Cluster.resource_segment(), "cluster");
        assert_eq!(ResourceKind::Instance.snapshot_segment(), "snapshot");
        assert_eq!(ResourceKind::Cluster.snapshot_segment(), "cluster-snapshot");
    }

    #[test]
    fn instances_run_before_clusters() {
        assert_eq!(
            ResourceKind::ALL,
            [ResourceKind::Instance, ResourceKind::Cluster]
        );
    }
}
