//! RDS-backed inventory using the AWS SDK.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rds::Client as RdsClient;
use aws_sdk_rds::config::Region;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::primitives::DateTime as SdkDateTime;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::Inventory;
use crate::domain::{Resource, ResourceArn, ResourceKind, Snapshot, Status, Tag};
use crate::error::{InventoryError, InventoryResult};

/// [`Inventory`] implementation talking to Amazon RDS.
///
/// Credentials come from the standard AWS provider chain; only the region is
/// taken from snapper configuration.
#[derive(Debug, Clone)]
pub struct RdsInventory {
    client: RdsClient,
}

impl RdsInventory {
    /// Builds a client for `region` from the default AWS configuration.
    pub async fn new(region: &str) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        debug!(region, "created RDS inventory client");
        Self {
            client: RdsClient::new(&aws_config),
        }
    }

    async fn list_instances(&self) -> InventoryResult<Vec<Resource>> {
        let mut pages = self.client.describe_db_instances().into_paginator().send();
        let mut resources = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_error("describe_db_instances", "instances", e))?;
            for db in page.db_instances() {
                let Some(id) = db.db_instance_identifier() else {
                    continue;
                };
                resources.push(Resource::new(
                    ResourceKind::Instance,
                    id,
                    status_of(db.db_instance_status()),
                ));
            }
        }
        Ok(resources)
    }

    async fn list_clusters(&self) -> InventoryResult<Vec<Resource>> {
        let mut pages = self.client.describe_db_clusters().into_paginator().send();
        let mut resources = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_error("describe_db_clusters", "clusters", e))?;
            for cluster in page.db_clusters() {
                let Some(id) = cluster.db_cluster_identifier() else {
                    continue;
                };
                resources.push(Resource::new(
                    ResourceKind::Cluster,
                    id,
                    status_of(cluster.status()),
                ));
            }
        }
        Ok(resources)
    }

    async fn list_instance_snapshots(&self) -> InventoryResult<Vec<Snapshot>> {
        let mut pages = self.client.describe_db_snapshots().into_paginator().send();
        let mut snapshots = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_error("describe_db_snapshots", "snapshots", e))?;
            for snap in page.db_snapshots() {
                let Some(id) = snap.db_snapshot_identifier() else {
                    continue;
                };
                let mut snapshot = Snapshot::new(
                    ResourceKind::Instance,
                    id,
                    status_of(snap.status()),
                    snap.snapshot_create_time().and_then(to_chrono),
                );
                if let Some(source) = snap.db_instance_identifier() {
                    snapshot = snapshot.with_resource_identifier(source);
                }
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }

    async fn list_cluster_snapshots(&self) -> InventoryResult<Vec<Snapshot>> {
        let mut pages = self
            .client
            .describe_db_cluster_snapshots()
            .into_paginator()
            .send();
        let mut snapshots = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| sdk_error("describe_db_cluster_snapshots", "cluster snapshots", e))?;
            for snap in page.db_cluster_snapshots() {
                let Some(id) = snap.db_cluster_snapshot_identifier() else {
                    continue;
                };
                let mut snapshot = Snapshot::new(
                    ResourceKind::Cluster,
                    id,
                    status_of(snap.status()),
                    snap.snapshot_create_time().and_then(to_chrono),
                );
                if let Some(source) = snap.db_cluster_identifier() {
                    snapshot = snapshot.with_resource_identifier(source);
                }
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }
}

#[async_trait]
impl Inventory for RdsInventory {
    async fn list_resources(&self, kind: ResourceKind) -> InventoryResult<Vec<Resource>> {
        match kind {
            ResourceKind::Instance => self.list_instances().await,
            ResourceKind::Cluster => self.list_clusters().await,
        }
    }

    async fn list_snapshots(&self, kind: ResourceKind) -> InventoryResult<Vec<Snapshot>> {
        match kind {
            ResourceKind::Instance => self.list_instance_snapshots().await,
            ResourceKind::Cluster => self.list_cluster_snapshots().await,
        }
    }

    async fn list_tags(&self, arn: &ResourceArn) -> InventoryResult<Vec<Tag>> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_name(arn.as_str())
            .send()
            .await
            .map_err(|e| sdk_error("list_tags_for_resource", arn.as_str(), e))?;

        Ok(output
            .tag_list()
            .iter()
            .filter_map(|t| {
                t.key()
                    .map(|k| Tag::new(k, t.value().unwrap_or_default()))
            })
            .collect())
    }

    async fn create_snapshot(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        snapshot_id: &str,
        tags: &[Tag],
    ) -> InventoryResult<()> {
        let sdk_tags: Vec<aws_sdk_rds::types::Tag> = tags
            .iter()
            .map(|t| {
                aws_sdk_rds::types::Tag::builder()
                    .key(&t.key)
                    .value(&t.value)
                    .build()
            })
            .collect();

        match kind {
            ResourceKind::Instance => {
                self.client
                    .create_db_snapshot()
                    .db_snapshot_identifier(snapshot_id)
                    .db_instance_identifier(resource_id)
                    .set_tags(Some(sdk_tags))
                    .send()
                    .await
                    .map_err(|e| sdk_error("create_db_snapshot", resource_id, e))?;
            }
            ResourceKind::Cluster => {
                self.client
                    .create_db_cluster_snapshot()
                    .db_cluster_snapshot_identifier(snapshot_id)
                    .db_cluster_identifier(resource_id)
                    .set_tags(Some(sdk_tags))
                    .send()
                    .await
                    .map_err(|e| sdk_error("create_db_cluster_snapshot", resource_id, e))?;
            }
        }
        Ok(())
    }

    async fn delete_snapshot(&self, kind: ResourceKind, snapshot_id: &str) -> InventoryResult<()> {
        match kind {
            ResourceKind::Instance => {
                self.client
                    .delete_db_snapshot()
                    .db_snapshot_identifier(snapshot_id)
                    .send()
                    .await
                    .map_err(|e| sdk_error("delete_db_snapshot", snapshot_id, e))?;
            }
            ResourceKind::Cluster => {
                self.client
                    .delete_db_cluster_snapshot()
                    .db_cluster_snapshot_identifier(snapshot_id)
                    .send()
                    .await
                    .map_err(|e| sdk_error("delete_db_cluster_snapshot", snapshot_id, e))?;
            }
        }
        Ok(())
    }
}

fn status_of(raw: Option<&str>) -> Status {
    raw.map_or_else(|| Status::Other(String::new()), Status::from_api)
}

fn to_chrono(t: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}

fn sdk_error<E: std::error::Error>(
    operation: &'static str,
    target: &str,
    err: E,
) -> InventoryError {
    InventoryError::new(operation, target, DisplayErrorContext(err).to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_is_not_available() {
        assert!(!status_of(None).is_available());
        assert!(status_of(Some("available")).is_available());
    }

    #[test]
    fn sdk_time_converts_to_utc() {
        let t = SdkDateTime::from_secs_and_nanos(1_709_266_503, 123_000_000);
        let Some(converted) = to_chrono(&t) else {
            panic!("timestamp in range");
        };
        assert_eq!(converted.timestamp(), 1_709_266_503);
        assert_eq!(converted.timestamp_subsec_micros(), 123_000);
    }
}
