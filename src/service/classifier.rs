//! Snapshot classification: grouping snapshots by backup source.
//!
//! Only `available` snapshots that carry the marker tag are considered.
//! Each is attributed to the resource named by the marker-tag value, and
//! every group is returned oldest first.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{ArnFactory, BackupSource, ResourceKind, Snapshot, tag};
use crate::error::InventoryResult;
use crate::inventory::Inventory;

/// Result of classifying one kind of snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Retention groups keyed by source, each sorted by creation time.
    pub groups: BTreeMap<BackupSource, Vec<Snapshot>>,

    /// Marker-tagged snapshots whose tag carries no source. These are
    /// quarantined: never grouped, never pruned.
    pub ungroupable: Vec<Snapshot>,
}

impl Classification {
    /// Total number of grouped snapshots.
    #[must_use]
    pub fn grouped_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Groups the available, marker-tagged snapshots of `kind` by backup
/// source.
///
/// Snapshots that are not `available`, have no creation time, lack the
/// marker tag, or whose tag lookup fails are left out. Within a group,
/// ordering is by creation time with ties kept in listing order.
///
/// # Errors
///
/// Returns an [`crate::error::InventoryError`] if the snapshot listing
/// itself fails.
pub async fn group_snapshots_by_source(
    inventory: &dyn Inventory,
    arns: &ArnFactory,
    kind: ResourceKind,
) -> InventoryResult<Classification> {
    let snapshots = inventory.list_snapshots(kind).await?;
    let mut result = Classification::default();

    for snapshot in snapshots {
        if !snapshot.status.is_available() || snapshot.created_at.is_none() {
            debug!(
                %kind,
                snapshot = %snapshot.identifier,
                status = %snapshot.status,
                "skipping snapshot not yet available"
            );
            continue;
        }

        let arn = arns.snapshot(kind, &snapshot.identifier);
        let tags = match inventory.list_tags(&arn).await {
            Ok(tags) => tags,
            Err(err) => {
                warn!(
                    %kind,
                    snapshot = %snapshot.identifier,
                    error = %err,
                    "tag lookup failed; skipping snapshot"
                );
                continue;
            }
        };

        let Some(value) = tag::marker_value(&tags) else {
            continue;
        };

        match BackupSource::from_tag_value(value) {
            Some(source) => result.groups.entry(source).or_default().push(snapshot),
            None => {
                warn!(
                    %kind,
                    snapshot = %snapshot.identifier,
                    "marker tag has no source; quarantining snapshot"
                );
                result.ungroupable.push(snapshot);
            }
        }
    }

    for group in result.groups.values_mut() {
        group.sort_by_key(|s| s.created_at);
    }

    debug!(
        %kind,
        grouped = result.grouped_count(),
        ungroupable = result.ungroupable.len(),
        groups = ?result.groups,
        "snapshots by source"
    );
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{MARKER_TAG, Status, Tag};
    use crate::inventory::InMemoryInventory;
    use chrono::{TimeZone, Utc};

    fn arns() -> ArnFactory {
        ArnFactory::new("eu-west-1", "123456789012")
    }

    fn snap(id: &str, status: Status, secs: i64) -> Snapshot {
        Snapshot::new(
            ResourceKind::Instance,
            id,
            status,
            Utc.timestamp_opt(secs, 0).single(),
        )
    }

    fn ids(snaps: &[Snapshot]) -> Vec<&str> {
        snaps.iter().map(|s| s.identifier.as_str()).collect()
    }

    fn source(name: &str) -> BackupSource {
        let Some(s) = BackupSource::from_tag_value(name) else {
            panic!("valid source");
        };
        s
    }

    #[tokio::test]
    async fn groups_by_tag_value_and_sorts_oldest_first() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(snap("orders-c", Status::Available, 30), vec![Tag::marker("orders")]);
        inv.add_snapshot(snap("orders-a", Status::Available, 10), vec![Tag::marker("orders")]);
        inv.add_snapshot(snap("billing-a", Status::Available, 5), vec![Tag::marker("billing")]);
        inv.add_snapshot(snap("orders-b", Status::Available, 20), vec![Tag::marker("orders")]);

        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };

        assert_eq!(result.groups.len(), 2);
        let keys: Vec<&str> = result.groups.keys().map(BackupSource::as_str).collect();
        assert_eq!(keys, vec!["billing", "orders"]);
        let Some(orders) = result.groups.get(&source("orders")) else {
            panic!("orders group missing");
        };
        assert_eq!(ids(orders), vec!["orders-a", "orders-b", "orders-c"]);
        assert_eq!(result.grouped_count(), 4);
    }

    #[tokio::test]
    async fn source_comes_from_tag_not_snapshot_name() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(
            snap("renamed-copy", Status::Available, 1),
            vec![Tag::marker("orders")],
        );
        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };
        assert!(result.groups.contains_key(&source("orders")));
    }

    #[tokio::test]
    async fn excludes_untagged_and_unavailable() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(snap("manual", Status::Available, 1), vec![Tag::new("owner", "ops")]);
        inv.add_snapshot(snap("in-flight", Status::Creating, 2), vec![Tag::marker("orders")]);
        inv.add_snapshot(snap("broken", Status::Failed, 3), vec![Tag::marker("orders")]);
        inv.add_snapshot(
            Snapshot::new(ResourceKind::Instance, "untimed", Status::Available, None),
            vec![Tag::marker("orders")],
        );
        inv.add_snapshot(snap("kept", Status::Available, 4), vec![Tag::marker("orders")]);

        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };
        assert_eq!(result.grouped_count(), 1);
        let Some(orders) = result.groups.get(&source("orders")) else {
            panic!("orders group missing");
        };
        assert_eq!(ids(orders), vec!["kept"]);
    }

    #[tokio::test]
    async fn blank_marker_value_is_quarantined() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(snap("orphan-1", Status::Available, 1), vec![Tag::new(MARKER_TAG, "")]);
        inv.add_snapshot(snap("orphan-2", Status::Available, 2), vec![Tag::new(MARKER_TAG, " ")]);

        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };
        assert!(result.groups.is_empty());
        assert_eq!(ids(&result.ungroupable), vec!["orphan-1", "orphan-2"]);
    }

    #[tokio::test]
    async fn tag_lookup_failure_skips_snapshot() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(snap("orders-a", Status::Available, 1), vec![Tag::marker("orders")]);
        inv.add_snapshot(snap("orders-b", Status::Available, 2), vec![Tag::marker("orders")]);
        inv.fail_lookup_for("orders-a");

        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };
        assert_eq!(result.grouped_count(), 1);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_listing_order() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(snap("first", Status::Available, 7), vec![Tag::marker("orders")]);
        inv.add_snapshot(snap("second", Status::Available, 7), vec![Tag::marker("orders")]);

        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };
        let Some(orders) = result.groups.get(&source("orders")) else {
            panic!("orders group missing");
        };
        assert_eq!(ids(orders), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn sources_differing_in_whitespace_stay_separate() {
        let inv = InMemoryInventory::new(arns());
        inv.add_snapshot(snap("padded", Status::Available, 1), vec![Tag::marker(" orders")]);
        inv.add_snapshot(snap("plain", Status::Available, 2), vec![Tag::marker("orders")]);

        let Ok(result) = group_snapshots_by_source(&inv, &arns(), ResourceKind::Instance).await
        else {
            panic!("classification failed");
        };
        assert_eq!(result.groups.len(), 2);
        let Some(padded) = result.groups.get(&source(" orders")) else {
            panic!("padded group missing");
        };
        assert_eq!(ids(padded), vec!["padded"]);
        let Some(plain) = result.groups.get(&source("orders")) else {
            panic!("plain group missing");
        };
        assert_eq!(ids(plain), vec!["plain"]);
    }
}
