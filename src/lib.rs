//! # rds-snapper
//!
//! Tag-driven snapshot creation and retention for RDS database instances
//! and clusters.
//!
//! Resources opt into backup by carrying the `LambderBackup` tag. Each run
//! prunes old snapshots per backup source, then requests one new snapshot
//! per available tagged resource. Snapshots record their source in the
//! marker-tag value, which is what retention groups them by.
//!
//! ## Architecture
//!
//! ```text
//! main (scheduled, no arguments)
//!     │
//!     ├── SnapperConfig (config)
//!     │
//!     ├── BackupDriver (service/)
//!     │     ├── Snapshot Classifier ──► Retention Planner ──► delete
//!     │     └── Resource Selector ──────────────────────────► create
//!     │
//!     └── Inventory (inventory/)
//!           ├── RdsInventory (AWS SDK)
//!           └── InMemoryInventory (tests)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod service;
