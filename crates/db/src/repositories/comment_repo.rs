//! Repository for the `task_comments` table.

use sqlx::PgPool;
use workdesk_core::task_ref::TaskRef;
use workdesk_core::types::DbId;

use crate::error::{validate_input, StoreError, StoreResult};
use crate::models::comment::{CreateTaskComment, TaskComment, UpdateTaskComment};
use crate::repositories::task_is_live;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_task_id, daily_task_id, content, author_id, author_name, \
    deleted_at, created_at, updated_at";

const FROM_LIVE: &str = "FROM task_comments WHERE deleted_at IS NULL";

/// Comments on project tasks and daily tasks.
pub struct TaskCommentRepo;

impl TaskCommentRepo {
    /// Insert a comment on exactly one live task.
    pub async fn create(pool: &PgPool, input: &CreateTaskComment) -> StoreResult<TaskComment> {
        validate_input(input)?;
        let task = TaskRef::from_ids(input.project_task_id, input.daily_task_id)?;

        let mut conn = pool.acquire().await?;
        if !task_is_live(&mut conn, task).await? {
            return Err(StoreError::invalid(format!(
                "{} {} does not exist",
                task.entity(),
                task.id()
            )));
        }

        let query = format!(
            "INSERT INTO task_comments (project_task_id, daily_task_id, content, author_id, author_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, TaskComment>(&query)
            .bind(task.project_task_id())
            .bind(task.daily_task_id())
            .bind(&input.content)
            .bind(input.author_id)
            .bind(&input.author_name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(comment)
    }

    /// Find a live comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaskComment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_LIVE} AND id = $1");
        sqlx::query_as::<_, TaskComment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Live comments on a task, newest first.
    pub async fn list_for_task(
        pool: &PgPool,
        task: TaskRef,
    ) -> Result<Vec<TaskComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} \
             AND project_task_id IS NOT DISTINCT FROM $1 \
             AND daily_task_id IS NOT DISTINCT FROM $2 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TaskComment>(&query)
            .bind(task.project_task_id())
            .bind(task.daily_task_id())
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_task(pool: &PgPool, task: TaskRef) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) {FROM_LIVE} \
             AND project_task_id IS NOT DISTINCT FROM $1 \
             AND daily_task_id IS NOT DISTINCT FROM $2"
        );
        let row: (i64,) = sqlx::query_as(&query)
            .bind(task.project_task_id())
            .bind(task.daily_task_id())
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Replace a comment's content. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTaskComment,
    ) -> StoreResult<Option<TaskComment>> {
        validate_input(input)?;
        let query = format!(
            "UPDATE task_comments SET content = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, TaskComment>(&query)
            .bind(id)
            .bind(&input.content)
            .fetch_optional(pool)
            .await?;
        Ok(comment)
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_comments SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
