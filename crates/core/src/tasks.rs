//! Task status, ordering, and statistics rules.
//!
//! Shared by project tasks and daily tasks. Status values are free-form
//! strings; only the terminal check below gives any of them meaning.

use std::collections::HashSet;

use crate::types::DbId;

/// Status assigned to a new task when none is supplied.
pub const DEFAULT_TASK_STATUS: &str = "todo";

/// Priority assigned to a new task when none is supplied.
pub const DEFAULT_TASK_PRIORITY: &str = "medium";

/// Statuses that mark a task complete, compared case-insensitively.
pub const TERMINAL_STATUSES: &[&str] = &["done", "completed"];

/// Whether setting `status` should stamp `completed_at`.
///
/// Setting a non-terminal status never clears an existing `completed_at`.
pub fn is_terminal_status(status: &str) -> bool {
    let status = status.trim();
    TERMINAL_STATUSES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(status))
}

/// `completed / total * 100`, rounded to two decimals. Zero when `total` is zero.
pub fn completion_percentage(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = completed as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Compute a dense 1-based ordering for every task in a column (or user scope).
///
/// `current` is the scope's live tasks sorted by their existing order.
/// Ids in `requested` come first in the given order; ids that are not part
/// of `current`, and repeats, are ignored. Unlisted tasks follow in their
/// existing order, so the result never holds duplicate or missing positions.
pub fn dense_order(requested: &[DbId], current: &[DbId]) -> Vec<(DbId, i32)> {
    let members: HashSet<DbId> = current.iter().copied().collect();
    let mut placed: HashSet<DbId> = HashSet::with_capacity(current.len());
    let mut ordered: Vec<DbId> = Vec::with_capacity(current.len());

    for id in requested {
        if members.contains(id) && placed.insert(*id) {
            ordered.push(*id);
        }
    }
    for id in current {
        if placed.insert(*id) {
            ordered.push(*id);
        }
    }

    ordered
        .into_iter()
        .zip(1..)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
