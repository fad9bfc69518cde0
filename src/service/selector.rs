//! Resource selection: which instances and clusters are opted into backup.

use tracing::{debug, warn};

use crate::domain::{ArnFactory, Resource, ResourceKind, tag};
use crate::error::InventoryResult;
use crate::inventory::Inventory;

/// Lists resources of `kind` carrying the marker tag, in listing order.
///
/// The tag's value is ignored and status is not checked here; whether a
/// resource can be backed up right now is decided by the driver. A resource
/// whose tag lookup fails is logged and left out.
///
/// # Errors
///
/// Returns an [`crate::error::InventoryError`] if the resource listing
/// itself fails.
pub async fn list_backup_eligible_resources(
    inventory: &dyn Inventory,
    arns: &ArnFactory,
    kind: ResourceKind,
) -> InventoryResult<Vec<Resource>> {
    let resources = inventory.list_resources(kind).await?;
    let mut eligible = Vec::with_capacity(resources.len());

    for resource in resources {
        let arn = arns.resource(kind, &resource.identifier);
        match inventory.list_tags(&arn).await {
            Ok(tags) if tag::has_marker(&tags) => eligible.push(resource),
            Ok(_) => debug!(%kind, resource = %resource.identifier, "not tagged for backup"),
            Err(err) => warn!(
                %kind,
                resource = %resource.identifier,
                error = %err,
                "tag lookup failed; skipping resource"
            ),
        }
    }

    Ok(eligible)
}
