//! Backup driver: prunes old snapshots, then requests new ones.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use super::classifier::group_snapshots_by_source;
use super::report::{KindReport, RunReport};
use super::retention::snapshots_to_delete;
use super::selector::list_backup_eligible_resources;
use crate::config::SnapperConfig;
use crate::domain::snapshot::snapshot_name;
use crate::domain::{ArnFactory, ResourceKind, Tag};
use crate::error::InventoryResult;
use crate::inventory::Inventory;

/// Orchestrates one backup cycle against an [`Inventory`].
///
/// Stateless between runs: every decision is recomputed from the live
/// inventory, so a run cut short by the scheduler is resumed safely by the
/// next one. Individual create/delete failures are logged and counted and
/// never stop the remaining work.
#[derive(Debug, Clone)]
pub struct BackupDriver {
    inventory: Arc<dyn Inventory>,
    arns: ArnFactory,
    max_to_keep: usize,
    dry_run: bool,
}

impl BackupDriver {
    /// Creates a driver keeping `max_to_keep` snapshots per source.
    #[must_use]
    pub fn new(inventory: Arc<dyn Inventory>, arns: ArnFactory, max_to_keep: usize) -> Self {
        Self {
            inventory,
            arns,
            max_to_keep,
            dry_run: false,
        }
    }

    /// Creates a driver from loaded configuration.
    #[must_use]
    pub fn from_config(inventory: Arc<dyn Inventory>, config: &SnapperConfig) -> Self {
        let arns = ArnFactory::new(config.region.as_str(), config.account_id.as_str());
        Self::new(inventory, arns, config.max_to_keep).with_dry_run(config.dry_run)
    }

    /// Enables or disables dry-run mode, in which no create or delete
    /// request is issued.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs a full cycle over both kinds.
    ///
    /// All pruning happens before any creation: instance and cluster
    /// snapshots are pruned first, then instances and clusters are backed
    /// up.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();

        for kind in ResourceKind::ALL {
            let counters = report.kind_mut(kind);
            if let Err(err) = self.prune(kind, counters).await {
                error!(%kind, error = %err, "pruning aborted");
                counters.aborted_phases += 1;
            }
        }

        for kind in ResourceKind::ALL {
            let counters = report.kind_mut(kind);
            if let Err(err) = self.create_backups(kind, counters).await {
                error!(%kind, error = %err, "backups aborted");
                counters.aborted_phases += 1;
            }
        }

        for kind in ResourceKind::ALL {
            let k = report.kind(kind);
            info!(
                %kind,
                groups = k.groups,
                deleted = k.deleted,
                created = k.created,
                skipped = k.skipped_unavailable,
                failures = k.failures(),
                dry_run = self.dry_run,
                "run finished"
            );
        }
        report
    }

    /// Prunes then backs up a single kind.
    pub async fn run_kind(&self, kind: ResourceKind) -> KindReport {
        let mut counters = KindReport::default();
        if let Err(err) = self.prune(kind, &mut counters).await {
            error!(%kind, error = %err, "pruning aborted");
            counters.aborted_phases += 1;
        }
        if let Err(err) = self.create_backups(kind, &mut counters).await {
            error!(%kind, error = %err, "backups aborted");
            counters.aborted_phases += 1;
        }
        counters
    }

    /// Deletes the snapshots each retention group no longer needs.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::error::InventoryError`] if listing snapshots
    /// fails. Failed deletions are counted, not returned.
    pub async fn prune(
        &self,
        kind: ResourceKind,
        counters: &mut KindReport,
    ) -> InventoryResult<()> {
        let classification =
            group_snapshots_by_source(self.inventory.as_ref(), &self.arns, kind).await?;
        counters.groups += classification.groups.len();
        counters.ungroupable += classification.ungroupable.len();

        for (source, group) in &classification.groups {
            let condemned = snapshots_to_delete(group, self.max_to_keep);
            debug!(
                %kind,
                %source,
                kept = group.len() - condemned.len(),
                condemned = ?condemned,
                "retention plan"
            );

            for snapshot in condemned {
                let reported = snapshot.resource_identifier.as_deref().unwrap_or_default();
                if self.dry_run {
                    info!(%kind, %source, reported, snapshot = %snapshot.identifier, "would delete snapshot");
                    counters.deleted += 1;
                    continue;
                }
                info!(%kind, %source, reported, snapshot = %snapshot.identifier, "deleting snapshot");
                match self
                    .inventory
                    .delete_snapshot(kind, &snapshot.identifier)
                    .await
                {
                    Ok(()) => counters.deleted += 1,
                    Err(err) => {
                        error!(
                            %kind,
                            snapshot = %snapshot.identifier,
                            error = %err,
                            "delete failed"
                        );
                        counters.delete_failures += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Requests a new snapshot of every eligible resource that is currently
    /// `available`.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::error::InventoryError`] if listing resources
    /// fails. Failed creations are counted, not returned.
    pub async fn create_backups(
        &self,
        kind: ResourceKind,
        counters: &mut KindReport,
    ) -> InventoryResult<()> {
        let eligible =
            list_backup_eligible_resources(self.inventory.as_ref(), &self.arns, kind).await?;
        counters.eligible += eligible.len();
        info!(%kind, count = eligible.len(), "found resources to back up");

        for resource in &eligible {
            if !resource.status.is_available() {
                debug!(
                    %kind,
                    resource = %resource.identifier,
                    status = %resource.status,
                    "skipping resource not available"
                );
                counters.skipped_unavailable += 1;
                continue;
            }

            let name = snapshot_name(&resource.identifier, Utc::now());
            if self.dry_run {
                info!(%kind, resource = %resource.identifier, snapshot = %name, "would back up");
                counters.created += 1;
                continue;
            }

            info!(%kind, resource = %resource.identifier, snapshot = %name, "backing up");
            let tags = [Tag::marker(&resource.identifier)];
            match self
                .inventory
                .create_snapshot(kind, &resource.identifier, &name, &tags)
                .await
            {
                Ok(()) => counters.created += 1,
                Err(err) => {
                    error!(%kind, resource = %resource.identifier, error = %err, "backup failed");
                    counters.create_failures += 1;
                }
            }
        }
        Ok(())
    }
}
