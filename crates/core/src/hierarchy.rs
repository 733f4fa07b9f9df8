//! Parent/child task hierarchy checks.
//!
//! Tasks point at their parent by id only. Before a task is re-parented the
//! store loads the project's `(task, parent)` pairs and asks
//! [`creates_cycle`] whether the new link would close a loop.

use std::collections::{HashMap, HashSet};

use crate::types::DbId;

/// Returns `true` if making `parent_id` the parent of `task_id` would put
/// `task_id` among its own ancestors (including the self-parent case).
///
/// `parents` maps each task id to its current parent. Chains that already
/// loop without passing through `task_id` are cut off rather than walked
/// forever.
pub fn creates_cycle(
    parents: &HashMap<DbId, Option<DbId>>,
    task_id: DbId,
    parent_id: DbId,
) -> bool {
    let mut seen = HashSet::new();
    let mut cursor = Some(parent_id);

    while let Some(current) = cursor {
        if current == task_id {
            return true;
        }
        if !seen.insert(current) {
            return false;
        }
        cursor = parents.get(&current).copied().flatten();
    }
    false
}
