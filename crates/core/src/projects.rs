//! Project-level rules: defaults, progress bounds, team de-duplication,
//! access placeholder, and sortable fields.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_PROJECT_STATUS: &str = "active";
pub const DEFAULT_PROJECT_TYPE: &str = "internal";
pub const DEFAULT_PROJECT_PRIORITY: &str = "medium";

pub const MIN_PROGRESS: i32 = 0;
pub const MAX_PROGRESS: i32 = 100;

/// Keep a progress value within `0..=100`.
pub fn clamp_progress(progress: i32) -> i32 {
    progress.clamp(MIN_PROGRESS, MAX_PROGRESS)
}

// ---------------------------------------------------------------------------
// Team roster
// ---------------------------------------------------------------------------

/// Drop repeated ids while keeping first-seen order.
pub fn dedup_team(team: &[DbId]) -> Vec<DbId> {
    let mut out = Vec::with_capacity(team.len());
    for id in team {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

/// Placeholder access rule: the owner or any team member may see a project.
pub fn has_access(owner_id: DbId, team: &[DbId], user_id: DbId) -> bool {
    owner_id == user_id || team.contains(&user_id)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort keys accepted by project search, mapped to their column.
pub const PROJECT_SORT_COLUMNS: &[(&str, &str)] = &[
    ("name", "name"),
    ("status", "status"),
    ("priority", "priority"),
    ("start_date", "start_date"),
    ("end_date", "end_date"),
    ("progress", "progress"),
    ("created_at", "created_at"),
];

/// Build the `ORDER BY` body for project search.
///
/// Unknown or missing keys fall back to newest-created first. `id` is
/// appended as a tiebreaker so pages are stable.
pub fn project_order_by(sort_by: Option<&str>, descending: bool) -> String {
    let column = sort_by.and_then(|key| {
        PROJECT_SORT_COLUMNS
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
            .map(|(_, col)| *col)
    });
    match column {
        Some(col) => {
            let dir = if descending { "DESC" } else { "ASC" };
            format!("{col} {dir} NULLS LAST, id {dir}")
        }
        None => "created_at DESC, id DESC".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(clamp_progress(-5), 0);
        assert_eq!(clamp_progress(42), 42);
        assert_eq!(clamp_progress(150), 100);
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        assert_eq!(dedup_team(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn owner_and_members_have_access() {
        assert!(has_access(7, &[1, 2], 7));
        assert!(has_access(7, &[1, 2], 2));
        assert!(!has_access(7, &[1, 2], 3));
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(project_order_by(None, false), "created_at DESC, id DESC");
        assert_eq!(
            project_order_by(Some("id; DROP TABLE projects"), true),
            "created_at DESC, id DESC"
        );
    }

    #[test]
    fn known_sort_uses_direction() {
        assert_eq!(
            project_order_by(Some("Name"), false),
            "name ASC NULLS LAST, id ASC"
        );
        assert_eq!(
            project_order_by(Some("progress"), true),
            "progress DESC NULLS LAST, id DESC"
        );
    }
}
