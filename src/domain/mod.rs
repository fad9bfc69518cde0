//! Domain layer: resources, snapshots, tags, and identifiers.
//!
//! This module contains the inventory-facing model shared by every
//! pipeline stage: the two resource kinds, operational status, the marker
//! tag, constructed resource identifiers, and the backup source key that
//! snapshots are grouped by.

pub mod arn;
pub mod backup_source;
pub mod kind;
pub mod resource;
pub mod snapshot;
pub mod status;
pub mod tag;

pub use arn::{ArnFactory, ResourceArn};
pub use backup_source::BackupSource;
pub use kind::ResourceKind;
pub use resource::Resource;
pub use snapshot::Snapshot;
pub use status::Status;
pub use tag::{MARKER_TAG, Tag};
