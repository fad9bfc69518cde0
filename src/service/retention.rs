//! Retention planning for one backup source.
//!
//! The planner runs before this cycle's new snapshot is requested, so it
//! frees one extra slot: after pruning and the subsequent create, a group
//! holds exactly `max_to_keep` snapshots.

use crate::domain::Snapshot;

/// Snapshots kept per backup source when configuration does not say
/// otherwise.
pub const DEFAULT_MAX_TO_KEEP: usize = 3;

/// Returns the prefix of `group` that must be deleted.
///
/// `group` must be ordered oldest first. With `n = group.len()`:
///
/// - `n < max_to_keep` deletes nothing;
/// - otherwise the `n - max_to_keep + 1` oldest are deleted, capped at `n`
///   (so `max_to_keep == 0` deletes the whole group).
#[must_use]
pub fn snapshots_to_delete(group: &[Snapshot], max_to_keep: usize) -> &[Snapshot] {
    let n = group.len();
    if n < max_to_keep {
        return &[];
    }
    let count = (n - max_to_keep).saturating_add(1).min(n);
    group.get(..count).unwrap_or_default()
}
