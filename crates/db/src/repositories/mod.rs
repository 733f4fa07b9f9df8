//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

use sqlx::PgConnection;
use workdesk_core::task_ref::TaskRef;

pub mod attachment_repo;
pub mod column_repo;
pub mod comment_repo;
pub mod daily_task_repo;
pub mod project_repo;
pub mod task_repo;

pub use attachment_repo::TaskAttachmentRepo;
pub use column_repo::ProjectColumnRepo;
pub use comment_repo::TaskCommentRepo;
pub use daily_task_repo::DailyTaskRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::ProjectTaskRepo;

/// Whether the task a comment or attachment points at exists and is live.
pub(crate) async fn task_is_live(
    conn: &mut PgConnection,
    task: TaskRef,
) -> Result<bool, sqlx::Error> {
    let query = match task {
        TaskRef::Project(_) => {
            "SELECT EXISTS(SELECT 1 FROM project_tasks WHERE id = $1 AND deleted_at IS NULL)"
        }
        TaskRef::Daily(_) => {
            "SELECT EXISTS(SELECT 1 FROM daily_tasks WHERE id = $1 AND deleted_at IS NULL)"
        }
    };
    let row: (bool,) = sqlx::query_as(query)
        .bind(task.id())
        .fetch_one(conn)
        .await?;
    Ok(row.0)
}
