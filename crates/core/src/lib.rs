//! Workdesk domain rules.
//!
//! Pure, I/O-free logic for the project board: ids and timestamps, error
//! kinds, pagination math, default columns, task status and ordering rules,
//! hierarchy cycle checks, attachment validation, project team rules, and
//! search patterns.
//! The `db` and `api` crates build on these.

pub mod attachments;
pub mod columns;
pub mod error;
pub mod hierarchy;
pub mod pagination;
pub mod projects;
pub mod search;
pub mod task_ref;
pub mod tasks;
pub mod types;
