//! Repository for the `task_attachments` table.
//!
//! Only metadata is stored here; the file itself lives at `file_url` and is
//! uploaded elsewhere. Type and size are checked before the row is written.

use sqlx::PgPool;
use workdesk_core::attachments::validate_attachment;
use workdesk_core::task_ref::TaskRef;
use workdesk_core::types::DbId;

use crate::error::{validate_input, StoreError, StoreResult};
use crate::models::attachment::{
    AttachmentStats, CreateTaskAttachment, TaskAttachment, UpdateTaskAttachment,
};
use crate::repositories::task_is_live;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_task_id, daily_task_id, file_name, file_url, mime_type, \
    file_size, caption, uploaded_by, uploaded_by_name, deleted_at, created_at, updated_at";

const FROM_LIVE: &str = "FROM task_attachments WHERE deleted_at IS NULL";

/// Attachment metadata, statistics, and orphan cleanup.
pub struct TaskAttachmentRepo;

impl TaskAttachmentRepo {
    /// Register an uploaded file against exactly one live task.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTaskAttachment,
    ) -> StoreResult<TaskAttachment> {
        validate_input(input)?;
        let task = TaskRef::from_ids(input.project_task_id, input.daily_task_id)?;
        validate_attachment(&input.mime_type, input.file_size)?;

        let mut conn = pool.acquire().await?;
        if !task_is_live(&mut conn, task).await? {
            return Err(StoreError::invalid(format!(
                "{} {} does not exist",
                task.entity(),
                task.id()
            )));
        }

        let query = format!(
            "INSERT INTO task_attachments
                (project_task_id, daily_task_id, file_name, file_url, mime_type, file_size,
                 caption, uploaded_by, uploaded_by_name)
             VALUES ($1, $2, $3, $4, LOWER(TRIM($5)), $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let attachment = sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(task.project_task_id())
            .bind(task.daily_task_id())
            .bind(&input.file_name)
            .bind(&input.file_url)
            .bind(&input.mime_type)
            .bind(input.file_size)
            .bind(&input.caption)
            .bind(input.uploaded_by)
            .bind(&input.uploaded_by_name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(attachment)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskAttachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_LIVE} AND id = $1");
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Live attachments on a task, newest first.
    pub async fn list_for_task(
        pool: &PgPool,
        task: TaskRef,
    ) -> Result<Vec<TaskAttachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} \
             AND project_task_id IS NOT DISTINCT FROM $1 \
             AND daily_task_id IS NOT DISTINCT FROM $2 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(task.project_task_id())
            .bind(task.daily_task_id())
            .fetch_all(pool)
            .await
    }

    /// Set or clear the caption. Returns `None` if the attachment does not exist.
    pub async fn update_caption(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTaskAttachment,
    ) -> Result<Option<TaskAttachment>, sqlx::Error> {
        let query = format!(
            "UPDATE task_attachments SET caption = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(id)
            .bind(&input.caption)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_attachments SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Statistics ───────────────────────────────────────────────────

    pub async fn stats_for_project_task(
        pool: &PgPool,
        project_task_id: DbId,
    ) -> Result<AttachmentStats, sqlx::Error> {
        Self::stats_where(pool, "project_task_id = $1", project_task_id).await
    }

    pub async fn stats_for_daily_task(
        pool: &PgPool,
        daily_task_id: DbId,
    ) -> Result<AttachmentStats, sqlx::Error> {
        Self::stats_where(pool, "daily_task_id = $1", daily_task_id).await
    }

    pub async fn stats_for_uploader(
        pool: &PgPool,
        uploaded_by: DbId,
    ) -> Result<AttachmentStats, sqlx::Error> {
        Self::stats_where(pool, "uploaded_by = $1", uploaded_by).await
    }

    async fn stats_where(
        pool: &PgPool,
        predicate: &'static str,
        id: DbId,
    ) -> Result<AttachmentStats, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*), COALESCE(SUM(file_size), 0)::BIGINT {FROM_LIVE} AND {predicate}"
        );
        let (count, total): (i64, i64) = sqlx::query_as(&query)
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(AttachmentStats::new(count, total))
    }

    // ── Maintenance ──────────────────────────────────────────────────

    /// Soft-delete live attachments whose task is missing or soft-deleted.
    pub async fn cleanup_orphaned(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_attachments a SET deleted_at = NOW(), updated_at = NOW()
             WHERE a.deleted_at IS NULL
               AND (
                 (a.project_task_id IS NOT NULL AND NOT EXISTS (
                    SELECT 1 FROM project_tasks t
                    WHERE t.id = a.project_task_id AND t.deleted_at IS NULL))
                 OR
                 (a.daily_task_id IS NOT NULL AND NOT EXISTS (
                    SELECT 1 FROM daily_tasks d
                    WHERE d.id = a.daily_task_id AND d.deleted_at IS NULL))
               )",
        )
        .execute(pool)
        .await?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::info!(removed, "Cleaned up orphaned task attachments");
        }
        Ok(removed)
    }
}
