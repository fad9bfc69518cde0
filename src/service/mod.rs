//! Service layer: the backup pipeline.
//!
//! [`selector`] and [`classifier`] read the inventory, [`retention`] decides
//! what to prune, and [`BackupDriver`] sequences them into a run and issues
//! the create/delete requests.

pub mod classifier;
pub mod driver;
pub mod report;
pub mod retention;
pub mod selector;

pub use classifier::{Classification, group_snapshots_by_source};
pub use driver::BackupDriver;
pub use report::{KindReport, RunReport};
pub use retention::{DEFAULT_MAX_TO_KEEP, snapshots_to_delete};
pub use selector::list_backup_eligible_resources;
