//! Constructed resource identifiers used for tag lookups.
//!
//! The inventory addresses tags by a fully-qualified identifier of the form
//! `arn:aws:rds:{region}:{account}:{segment}:{name}`. [`ArnFactory`] holds
//! the region and account from configuration and formats these strings.

use std::fmt;

use super::ResourceKind;

/// Fully-qualified identifier of a resource or snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceArn(String);

impl ResourceArn {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds [`ResourceArn`]s for one region and account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnFactory {
    region: String,
    account_id: String,
}

impl ArnFactory {
    /// Creates a factory for the given region and account.
    #[must_use]
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
        }
    }

    /// Identifier of the resource `name` (`db` or `cluster` segment).
    #[must_use]
    pub fn resource(&self, kind: ResourceKind, name: &str) -> ResourceArn {
        self.build(kind.resource_segment(), name)
    }

    /// Identifier of the snapshot `name` (`snapshot` or `cluster-snapshot`
    /// segment).
    #[must_use]
    pub fn snapshot(&self, kind: ResourceKind, name: &str) -> ResourceArn {
        self.build(kind.snapshot_segment(), name)
    }

    fn build(&self, segment: &str, name: &str) -> ResourceArn {
        ResourceArn(format!(
            "arn:aws:rds:{}:{}:{segment}:{name}",
            self.region, self.account_id
        ))
    }
}
