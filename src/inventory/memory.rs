//! In-memory inventory with call recording and failure injection.
//!
//! Tags are keyed by constructed identifier exactly as the remote service
//! does, so the same [`ArnFactory`] must be used here and by the pipelines.
//! Newly created snapshots start in `creating` status with no creation
//! time; [`InMemoryInventory::complete_pending`] makes them available.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Inventory;
use crate::domain::{ArnFactory, Resource, ResourceArn, ResourceKind, Snapshot, Status, Tag};
use crate::error::{InventoryError, InventoryResult};

/// A mutating call observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCall {
    /// `create_snapshot` was issued.
    Create {
        /// Snapshot kind.
        kind: ResourceKind,
        /// Resource being snapshotted.
        resource_id: String,
        /// Requested snapshot identifier.
        snapshot_id: String,
    },
    /// `delete_snapshot` was issued.
    Delete {
        /// Snapshot kind.
        kind: ResourceKind,
        /// Snapshot being deleted.
        snapshot_id: String,
    },
}

#[derive(Debug, Default)]
struct State {
    resources: Vec<Resource>,
    snapshots: Vec<Snapshot>,
    tags: HashMap<ResourceArn, Vec<Tag>>,
    calls: Vec<InventoryCall>,
    failing_targets: HashSet<String>,
    failing_lookups: HashSet<String>,
    failing_listings: HashSet<ResourceKind>,
}

/// Fake [`Inventory`] backed by in-process collections.
#[derive(Debug)]
pub struct InMemoryInventory {
    arns: ArnFactory,
    state: Mutex<State>,
}

impl InMemoryInventory {
    /// Creates an empty inventory addressing tags through `arns`.
    #[must_use]
    pub fn new(arns: ArnFactory) -> Self {
        Self {
            arns,
            state: Mutex::new(State::default()),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }

    /// Adds a resource with the given tags.
    pub fn add_resource(&self, resource: Resource, tags: Vec<Tag>) {
        let arn = self.arns.resource(resource.kind, &resource.identifier);
        self.with_state(|s| {
            s.tags.insert(arn, tags);
            s.resources.push(resource);
        });
    }

    /// Adds an existing snapshot with the given tags.
    pub fn add_snapshot(&self, snapshot: Snapshot, tags: Vec<Tag>) {
        let arn = self.arns.snapshot(snapshot.kind, &snapshot.identifier);
        self.with_state(|s| {
            s.tags.insert(arn, tags);
            s.snapshots.push(snapshot);
        });
    }

    /// Makes create requests for resource `target` and delete requests for
    /// snapshot `target` fail.
    pub fn fail_for(&self, target: impl Into<String>) {
        let target = target.into();
        self.with_state(|s| {
            s.failing_targets.insert(target);
        });
    }

    /// Makes tag lookups for the resource or snapshot named `target` fail.
    pub fn fail_lookup_for(&self, target: impl Into<String>) {
        let target = target.into();
        self.with_state(|s| {
            s.failing_lookups.insert(target);
        });
    }

    /// Makes both listings of `kind` fail.
    pub fn fail_listing(&self, kind: ResourceKind) {
        self.with_state(|s| {
            s.failing_listings.insert(kind);
        });
    }

    /// Moves every snapshot still being created to `available`, stamped
    /// with `at`.
    pub fn complete_pending(&self, at: DateTime<Utc>) {
        self.with_state(|s| {
            for snap in s.snapshots.iter_mut().filter(|x| x.status == Status::Creating) {
                snap.status = Status::Available;
                snap.created_at = Some(at);
            }
        });
    }

    /// Returns the mutating calls issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<InventoryCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// Returns the identifiers of all snapshots of `kind` currently held.
    #[must_use]
    pub fn snapshot_ids(&self, kind: ResourceKind) -> Vec<String> {
        self.with_state(|s| {
            s.snapshots
                .iter()
                .filter(|x| x.kind == kind)
                .map(|x| x.identifier.clone())
                .collect()
        })
    }

    /// Returns the tags stored for `arn`.
    #[must_use]
    pub fn tags_of(&self, arn: &ResourceArn) -> Vec<Tag> {
        self.with_state(|s| s.tags.get(arn).cloned().unwrap_or_default())
    }
}

fn injected(operation: &'static str, target: &str) -> InventoryError {
    InventoryError::new(operation, target, "injected failure")
}

#[async_trait]
impl Inventory for InMemoryInventory {
    async fn list_resources(&self, kind: ResourceKind) -> InventoryResult<Vec<Resource>> {
        self.with_state(|s| {
            if s.failing_listings.contains(&kind) {
                return Err(injected("list_resources", kind.label()));
            }
            Ok(s.resources.iter().filter(|r| r.kind == kind).cloned().collect())
        })
    }

    async fn list_snapshots(&self, kind: ResourceKind) -> InventoryResult<Vec<Snapshot>> {
        self.with_state(|s| {
            if s.failing_listings.contains(&kind) {
                return Err(injected("list_snapshots", kind.label()));
            }
            Ok(s.snapshots.iter().filter(|x| x.kind == kind).cloned().collect())
        })
    }

    async fn list_tags(&self, arn: &ResourceArn) -> InventoryResult<Vec<Tag>> {
        self.with_state(|s| {
            let name = arn.as_str().rsplit(':').next().unwrap_or_default();
            if s.failing_lookups.contains(name) {
                return Err(injected("list_tags", arn.as_str()));
            }
            Ok(s.tags.get(arn).cloned().unwrap_or_default())
        })
    }

    async fn create_snapshot(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        snapshot_id: &str,
        tags: &[Tag],
    ) -> InventoryResult<()> {
        let arn = self.arns.snapshot(kind, snapshot_id);
        self.with_state(|s| {
            s.calls.push(InventoryCall::Create {
                kind,
                resource_id: resource_id.to_string(),
                snapshot_id: snapshot_id.to_string(),
            });
            if s.failing_targets.contains(resource_id) {
                return Err(injected("create_snapshot", resource_id));
            }
            if s.snapshots
                .iter()
                .any(|x| x.kind == kind && x.identifier == snapshot_id)
            {
                return Err(InventoryError::new(
                    "create_snapshot",
                    snapshot_id,
                    "snapshot already exists",
                ));
            }
            s.snapshots.push(
                Snapshot::new(kind, snapshot_id, Status::Creating, None)
                    .with_resource_identifier(resource_id),
            );
            s.tags.insert(arn, tags.to_vec());
            Ok(())
        })
    }

    async fn delete_snapshot(&self, kind: ResourceKind, snapshot_id: &str) -> InventoryResult<()> {
        let arn = self.arns.snapshot(kind, snapshot_id);
        self.with_state(|s| {
            s.calls.push(InventoryCall::Delete {
                kind,
                snapshot_id: snapshot_id.to_string(),
            });
            if s.failing_targets.contains(snapshot_id) {
                return Err(injected("delete_snapshot", snapshot_id));
            }
            let before = s.snapshots.len();
            s.snapshots
                .retain(|x| !(x.kind == kind && x.identifier == snapshot_id));
            if s.snapshots.len() == before {
                return Err(InventoryError::new(
                    "delete_snapshot",
                    snapshot_id,
                    "snapshot not found",
                ));
            }
            s.tags.remove(&arn);
            Ok(())
        })
    }
}
