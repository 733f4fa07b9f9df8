//! Repository for the `project_columns` table.
//!
//! Columns are hard-deleted. Deleting a column first disposes of its live
//! tasks (moved to another column of the same project, or soft-deleted) in
//! the same transaction, so no live task is ever left pointing at a column
//! that no longer exists.

use sqlx::{PgConnection, PgPool};
use workdesk_core::columns::{can_remove_columns, DEFAULT_COLUMNS, DEFAULT_COLUMN_COLOR};
use workdesk_core::types::DbId;

use crate::error::{validate_input, StoreError, StoreResult};
use crate::models::column::{
    ColumnPosition, ColumnWithCount, CreateColumn, ProjectColumn, UpdateColumn,
};
use crate::repositories::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, title, color, position, is_default, task_limit, created_at, updated_at";

/// Same columns qualified with the `c` alias, for joins.
const C_COLUMNS: &str = "c.id, c.project_id, c.title, c.color, c.position, c.is_default, \
    c.task_limit, c.created_at, c.updated_at";

/// Board-column CRUD, ordering, and deletion with task disposition.
pub struct ProjectColumnRepo;

impl ProjectColumnRepo {
    // ── Reads ────────────────────────────────────────────────────────

    /// Find a column by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectColumn>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// List a project's columns ordered by position, each with its live task count.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ColumnWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS}, COUNT(t.id) AS task_count
             FROM project_columns c
             LEFT JOIN project_tasks t ON t.column_id = c.id AND t.deleted_at IS NULL
             WHERE c.project_id = $1
             GROUP BY c.id
             ORDER BY c.position, c.id"
        );
        sqlx::query_as::<_, ColumnWithCount>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Number of live tasks currently in a column.
    pub async fn task_count(pool: &PgPool, column_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_tasks WHERE column_id = $1 AND deleted_at IS NULL",
        )
        .bind(column_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Whether the column may be deleted: its project must keep at least one
    /// other column. Unknown columns cannot be deleted.
    pub async fn can_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_columns \
             WHERE project_id = (SELECT project_id FROM project_columns WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(can_remove_columns(row.0, 1))
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Insert a column. A missing or non-positive `position` appends it after
    /// the project's current last column.
    pub async fn create(pool: &PgPool, input: &CreateColumn) -> StoreResult<ProjectColumn> {
        validate_input(input)?;
        let mut conn = pool.acquire().await?;
        if !ProjectRepo::exists_in(&mut conn, input.project_id).await? {
            return Err(StoreError::not_found("Project", input.project_id));
        }

        let query = format!(
            "INSERT INTO project_columns (project_id, title, color, position, is_default, task_limit)
             VALUES (
                $1, $2, COALESCE($3, '{DEFAULT_COLUMN_COLOR}'),
                CASE WHEN $4::INTEGER > 0 THEN $4
                     ELSE (SELECT COALESCE(MAX(position), 0) + 1 FROM project_columns WHERE project_id = $1)
                END,
                COALESCE($5, false), $6
             )
             RETURNING {COLUMNS}"
        );
        let column = sqlx::query_as::<_, ProjectColumn>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.color)
            .bind(input.position)
            .bind(input.is_default)
            .bind(input.task_limit)
            .fetch_one(&mut *conn)
            .await?;
        Ok(column)
    }

    /// Update a column. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no column with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateColumn,
    ) -> StoreResult<Option<ProjectColumn>> {
        validate_input(input)?;
        let query = format!(
            "UPDATE project_columns SET
                title = COALESCE($2, title),
                color = COALESCE($3, color),
                position = COALESCE($4, position),
                is_default = COALESCE($5, is_default),
                task_limit = COALESCE($6, task_limit),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let column = sqlx::query_as::<_, ProjectColumn>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.color)
            .bind(input.position)
            .bind(input.is_default)
            .bind(input.task_limit)
            .fetch_optional(pool)
            .await?;
        Ok(column)
    }

    /// Delete a column, first moving its live tasks to `move_tasks_to` or,
    /// when no target is given, soft-deleting them.
    ///
    /// Runs in one transaction. Returns `false` if the column does not exist.
    pub async fn delete(pool: &PgPool, id: DbId, move_tasks_to: Option<DbId>) -> StoreResult<bool> {
        let mut tx = pool.begin().await?;

        let Some(column) = Self::find_in(&mut tx, id).await? else {
            return Ok(false);
        };
        let affected = Self::dispose_tasks(&mut tx, &column, move_tasks_to).await?;
        Self::hard_delete_in(&mut tx, id).await?;

        tx.commit().await?;
        tracing::info!(
            column_id = id,
            project_id = column.project_id,
            tasks_affected = affected,
            moved_to = ?move_tasks_to,
            "Deleted board column"
        );
        Ok(true)
    }

    /// Delete several columns of one project in a single transaction.
    ///
    /// Fails without changing anything if an id belongs to another project
    /// (or does not exist), if the move target is itself being deleted, or if
    /// the project would be left without columns. Returns the number deleted.
    pub async fn delete_many(
        pool: &PgPool,
        project_id: DbId,
        ids: &[DbId],
        move_tasks_to: Option<DbId>,
    ) -> StoreResult<u64> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        if let Some(target) = move_tasks_to {
            if ids.contains(&target) {
                return Err(StoreError::invalid(
                    "Cannot move tasks into a column that is being deleted",
                ));
            }
        }

        let mut tx = pool.begin().await?;

        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_columns WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(&mut *tx)
                .await?;
        if !can_remove_columns(row.0, ids.len() as i64) {
            return Err(StoreError::invalid(
                "A project must keep at least one column",
            ));
        }

        for &id in &ids {
            let column = match Self::find_in(&mut tx, id).await? {
                Some(c) if c.project_id == project_id => c,
                _ => {
                    return Err(StoreError::invalid(format!(
                        "Column {id} does not belong to project {project_id}"
                    )))
                }
            };
            Self::dispose_tasks(&mut tx, &column, move_tasks_to).await?;
            Self::hard_delete_in(&mut tx, id).await?;
        }

        tx.commit().await?;
        tracing::info!(project_id, deleted = ids.len(), "Bulk-deleted board columns");
        Ok(ids.len() as u64)
    }

    /// Apply new positions to a project's columns in one transaction.
    ///
    /// Columns not listed keep their position. Fails (and rolls back) if any
    /// listed column is not part of the project.
    pub async fn reorder(
        pool: &PgPool,
        project_id: DbId,
        positions: &[ColumnPosition],
    ) -> StoreResult<()> {
        let mut tx = pool.begin().await?;
        for entry in positions {
            let result = sqlx::query(
                "UPDATE project_columns SET position = $3, updated_at = NOW() \
                 WHERE id = $1 AND project_id = $2",
            )
            .bind(entry.column_id)
            .bind(project_id)
            .bind(entry.position)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::invalid(format!(
                    "Column {} does not belong to project {project_id}",
                    entry.column_id
                )));
            }
        }
        tx.commit().await?;
        Ok(())
    }

    /// Seed the four default columns for an existing project.
    pub async fn create_default_columns(
        pool: &PgPool,
        project_id: DbId,
    ) -> StoreResult<Vec<ProjectColumn>> {
        let mut tx = pool.begin().await?;
        if !ProjectRepo::exists_in(&mut tx, project_id).await? {
            return Err(StoreError::not_found("Project", project_id));
        }
        let columns = Self::insert_default_columns(&mut tx, project_id).await?;
        tx.commit().await?;
        Ok(columns)
    }

    // ── Connection-level helpers ─────────────────────────────────────

    pub(crate) async fn find_in(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ProjectColumn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_columns WHERE id = $1");
        sqlx::query_as::<_, ProjectColumn>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Insert "To Do", "In Progress", "Review", and "Done" on the given connection.
    pub(crate) async fn insert_default_columns(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<ProjectColumn>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_columns (project_id, title, color, position, is_default)
             VALUES ($1, $2, $3, $4, true)
             RETURNING {COLUMNS}"
        );
        let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
        for seed in DEFAULT_COLUMNS {
            let column = sqlx::query_as::<_, ProjectColumn>(&query)
                .bind(project_id)
                .bind(seed.title)
                .bind(seed.color)
                .bind(seed.position)
                .fetch_one(&mut *conn)
                .await?;
            columns.push(column);
        }
        Ok(columns)
    }

    async fn hard_delete_in(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_columns WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Move or soft-delete the live tasks of `column`. Returns the number of
    /// tasks touched.
    async fn dispose_tasks(
        conn: &mut PgConnection,
        column: &ProjectColumn,
        move_tasks_to: Option<DbId>,
    ) -> StoreResult<u64> {
        let live: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_tasks WHERE column_id = $1 AND deleted_at IS NULL",
        )
        .bind(column.id)
        .fetch_one(&mut *conn)
        .await?;
        if live.0 == 0 {
            return Ok(0);
        }

        let Some(target_id) = move_tasks_to else {
            let result = sqlx::query(
                "UPDATE project_tasks SET deleted_at = NOW(), updated_at = NOW() \
                 WHERE column_id = $1 AND deleted_at IS NULL",
            )
            .bind(column.id)
            .execute(&mut *conn)
            .await?;
            return Ok(result.rows_affected());
        };

        if target_id == column.id {
            return Err(StoreError::invalid(
                "Cannot move tasks into the column being deleted",
            ));
        }
        match Self::find_in(&mut *conn, target_id).await? {
            Some(target) if target.project_id == column.project_id => {}
            Some(_) => {
                return Err(StoreError::invalid(format!(
                    "Target column {target_id} belongs to a different project"
                )))
            }
            None => {
                return Err(StoreError::invalid(format!(
                    "Target column {target_id} does not exist"
                )))
            }
        }

        // Append after the target's last live task, keeping the source order.
        let result = sqlx::query(
            "WITH base AS (
                SELECT COALESCE(MAX(position), 0) AS max_pos
                FROM project_tasks WHERE column_id = $2 AND deleted_at IS NULL
             ),
             moving AS (
                SELECT id, ROW_NUMBER() OVER (ORDER BY position, id) AS rn
                FROM project_tasks WHERE column_id = $1 AND deleted_at IS NULL
             )
             UPDATE project_tasks t
             SET column_id = $2, position = base.max_pos + moving.rn, updated_at = NOW()
             FROM moving, base
             WHERE t.id = moving.id",
        )
        .bind(column.id)
        .bind(target_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}
