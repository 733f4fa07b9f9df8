//! Board column constants.

/// A column seeded into every new project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultColumn {
    pub title: &'static str,
    pub color: &'static str,
    pub position: i32,
}

/// The four columns every project starts with, in board order.
pub const DEFAULT_COLUMNS: [DefaultColumn; 4] = [
    DefaultColumn {
        title: "To Do",
        color: "#6B7280",
        position: 1,
    },
    DefaultColumn {
        title: "In Progress",
        color: "#3B82F6",
        position: 2,
    },
    DefaultColumn {
        title: "Review",
        color: "#F59E0B",
        position: 3,
    },
    DefaultColumn {
        title: "Done",
        color: "#10B981",
        position: 4,
    },
];

/// Color used when a column is created without one.
pub const DEFAULT_COLUMN_COLOR: &str = "#6B7280";

/// Minimum number of columns a project must keep.
pub const MIN_COLUMNS_PER_PROJECT: i64 = 1;

/// Whether a project holding `column_count` columns may lose `removing` of them.
pub fn can_remove_columns(column_count: i64, removing: i64) -> bool {
    column_count - removing >= MIN_COLUMNS_PER_PROJECT
}
