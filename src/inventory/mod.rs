//! Inventory layer: the remote database-management API.
//!
//! [`Inventory`] is the only way the pipelines touch the outside world. It
//! is passed explicitly as an `Arc<dyn Inventory>` so tests can substitute
//! [`InMemoryInventory`] for the AWS-backed [`RdsInventory`].

pub mod memory;
pub mod rds;

use async_trait::async_trait;

use crate::domain::{Resource, ResourceArn, ResourceKind, Snapshot, Tag};
use crate::error::InventoryResult;

pub use memory::InMemoryInventory;
pub use rds::RdsInventory;

/// Operations consumed from the database-management service.
///
/// Every call is a single remote round trip. Tag lookups are per item, so a
/// classification pass costs one call per listed snapshot.
#[async_trait]
pub trait Inventory: Send + Sync + std::fmt::Debug {
    /// Lists all resources of `kind`.
    async fn list_resources(&self, kind: ResourceKind) -> InventoryResult<Vec<Resource>>;

    /// Lists all snapshots of `kind`, in any status.
    async fn list_snapshots(&self, kind: ResourceKind) -> InventoryResult<Vec<Snapshot>>;

    /// Returns the tags attached to the resource or snapshot `arn`.
    async fn list_tags(&self, arn: &ResourceArn) -> InventoryResult<Vec<Tag>>;

    /// Requests a new snapshot `snapshot_id` of `resource_id` carrying
    /// `tags`.
    async fn create_snapshot(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        snapshot_id: &str,
        tags: &[Tag],
    ) -> InventoryResult<()>;

    /// Requests deletion of snapshot `snapshot_id`.
    async fn delete_snapshot(&self, kind: ResourceKind, snapshot_id: &str) -> InventoryResult<()>;
}
