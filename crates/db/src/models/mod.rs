//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! List-valued columns (`tags`, `team_members`, `attachment_urls`) are JSONB
//! in the database and plain `Vec`s here; `#[sqlx(json)]` decodes them and
//! repositories bind them through `sqlx::types::Json`.

pub mod attachment;
pub mod column;
pub mod comment;
pub mod daily_task;
pub mod project;
pub mod task;
