//! Repository for the `project_tasks` table.
//!
//! Positions are dense per column: a new task lands at `max + 1`. Moving a
//! task overwrites its column and position without shifting neighbours;
//! `reorder_in_column` is the operation that restores a clean 1..n order.

use std::collections::HashMap;

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres};
use workdesk_core::hierarchy::creates_cycle;
use workdesk_core::pagination::{Page, PageRequest};
use workdesk_core::search::contains_pattern;
use workdesk_core::tasks::{
    completion_percentage, dense_order, is_terminal_status, DEFAULT_TASK_PRIORITY,
    DEFAULT_TASK_STATUS,
};
use workdesk_core::types::DbId;

use crate::error::{validate_input, StoreError, StoreResult};
use crate::models::project::{Project, ProjectStats};
use crate::models::task::{CreateProjectTask, ProjectTask, TaskFilter, UpdateProjectTask};
use crate::repositories::{ProjectColumnRepo, ProjectRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, column_id, title, description, contact_id, assignee_id, \
    assignee_name, status, priority, position, parent_task_id, due_date, start_date, \
    completed_at, estimated_hours, actual_hours, tags, attachment_urls, created_by, \
    updated_by, deleted_at, created_at, updated_at";

/// Every read goes through this so soft-deleted rows never leak.
const FROM_LIVE: &str = "FROM project_tasks WHERE deleted_at IS NULL";

/// Search predicate; `$1..=$6` are bound by [`bind_filter`].
const SEARCH_FILTER: &str = "\
    ($1::TEXT IS NULL OR title ILIKE $1 OR description ILIKE $1) \
    AND ($2::TEXT IS NULL OR status = $2) \
    AND ($3::TEXT IS NULL OR priority = $3) \
    AND ($4::BIGINT IS NULL OR project_id = $4) \
    AND ($5::BIGINT IS NULL OR assignee_id = $5) \
    AND ($6::BIGINT IS NULL OR contact_id = $6)";

/// Provides CRUD, movement, hierarchy, and statistics for project tasks.
pub struct ProjectTaskRepo;

impl ProjectTaskRepo {
    // ── Reads ────────────────────────────────────────────────────────

    /// Find a live task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectTask>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// Live tasks of a column in board order.
    pub async fn list_by_column(
        pool: &PgPool,
        column_id: DbId,
    ) -> Result<Vec<ProjectTask>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} {FROM_LIVE} AND column_id = $1 ORDER BY position, id");
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(column_id)
            .fetch_all(pool)
            .await
    }

    /// Live tasks of a project, grouped by column then position.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} AND project_id = $1 ORDER BY column_id, position, id"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Live direct children of a task.
    pub async fn list_sub_tasks(
        pool: &PgPool,
        parent_task_id: DbId,
    ) -> Result<Vec<ProjectTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} AND parent_task_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(parent_task_id)
            .fetch_all(pool)
            .await
    }

    /// Live tasks assigned to a user, soonest due first.
    pub async fn list_by_assignee(
        pool: &PgPool,
        assignee_id: DbId,
    ) -> Result<Vec<ProjectTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} AND assignee_id = $1 \
             ORDER BY due_date ASC NULLS LAST, id"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(assignee_id)
            .fetch_all(pool)
            .await
    }

    /// Position a new task in this column would receive (1 when empty).
    pub async fn next_position(pool: &PgPool, column_id: DbId) -> Result<i32, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::next_position_in(&mut conn, column_id).await
    }

    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a task at the end of its column.
    ///
    /// The column must belong to `input.project_id`, and a parent, if given,
    /// must be a live task of the same project.
    pub async fn create(pool: &PgPool, input: &CreateProjectTask) -> StoreResult<ProjectTask> {
        validate_input(input)?;
        let mut tx = pool.begin().await?;

        if !ProjectRepo::exists_in(&mut tx, input.project_id).await? {
            return Err(StoreError::not_found("Project", input.project_id));
        }
        Self::ensure_column_in_project(&mut tx, input.column_id, input.project_id).await?;
        if let Some(parent_id) = input.parent_task_id {
            Self::ensure_parent_in_project(&mut tx, parent_id, input.project_id).await?;
        }

        let position = Self::next_position_in(&mut tx, input.column_id).await?;
        let completed = input.status.as_deref().is_some_and(is_terminal_status);

        let query = format!(
            "INSERT INTO project_tasks
                (project_id, column_id, title, description, contact_id, assignee_id,
                 assignee_name, status, priority, position, parent_task_id, due_date,
                 start_date, completed_at, estimated_hours, tags, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     COALESCE($8, '{DEFAULT_TASK_STATUS}'),
                     COALESCE($9, '{DEFAULT_TASK_PRIORITY}'),
                     $10, $11, $12, $13,
                     CASE WHEN $14 THEN NOW() END,
                     $15, $16, $17, $17)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, ProjectTask>(&query)
            .bind(input.project_id)
            .bind(input.column_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.contact_id)
            .bind(input.assignee_id)
            .bind(&input.assignee_name)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(position)
            .bind(input.parent_task_id)
            .bind(input.due_date)
            .bind(input.start_date)
            .bind(completed)
            .bind(input.estimated_hours)
            .bind(Json(&input.tags))
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// A terminal status stamps `completed_at`. Returns `None` if no live
    /// task with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectTask,
    ) -> StoreResult<Option<ProjectTask>> {
        validate_input(input)?;
        let completed = input.status.as_deref().is_some_and(is_terminal_status);
        let query = format!(
            "UPDATE project_tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                contact_id = COALESCE($4, contact_id),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date),
                start_date = COALESCE($8, start_date),
                estimated_hours = COALESCE($9, estimated_hours),
                actual_hours = COALESCE($10, actual_hours),
                tags = COALESCE($11, tags),
                attachment_urls = COALESCE($12, attachment_urls),
                updated_by = COALESCE($13, updated_by),
                completed_at = CASE WHEN $14 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.contact_id)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.start_date)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(input.tags.as_ref().map(Json))
            .bind(input.attachment_urls.as_ref().map(Json))
            .bind(input.updated_by)
            .bind(completed)
            .fetch_optional(pool)
            .await?;
        Ok(task)
    }

    /// Soft-delete a task. Sub-tasks are left alone and keep their parent id.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_tasks SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Movement and ordering ────────────────────────────────────────

    /// Move a task to `column_id` at `position`. Other tasks are not shifted.
    ///
    /// The column must belong to the task's project. Returns `None` if the
    /// task does not exist.
    pub async fn move_task(
        pool: &PgPool,
        id: DbId,
        column_id: DbId,
        position: i32,
    ) -> StoreResult<Option<ProjectTask>> {
        let mut conn = pool.acquire().await?;
        let Some(task) = Self::find_in(&mut conn, id).await? else {
            return Ok(None);
        };
        Self::ensure_column_in_project(&mut conn, column_id, task.project_id).await?;
        let moved = Self::move_in(&mut conn, id, column_id, position).await?;
        Ok(Some(moved))
    }

    /// Move several tasks to one column in a single transaction.
    ///
    /// Each task is validated on its own; one missing task or foreign column
    /// rolls back the whole batch. Returns the number of tasks moved.
    pub async fn bulk_move(
        pool: &PgPool,
        ids: &[DbId],
        column_id: DbId,
        position: i32,
    ) -> StoreResult<u64> {
        let mut tx = pool.begin().await?;
        for &id in ids {
            let task = Self::find_in(&mut tx, id)
                .await?
                .ok_or(StoreError::not_found("ProjectTask", id))?;
            Self::ensure_column_in_project(&mut tx, column_id, task.project_id).await?;
            Self::move_in(&mut tx, id, column_id, position).await?;
        }
        tx.commit().await?;
        tracing::info!(moved = ids.len(), column_id, "Bulk-moved tasks");
        Ok(ids.len() as u64)
    }

    /// Renumber a column's live tasks 1..n, with `ordered_ids` first.
    ///
    /// Tasks missing from `ordered_ids` keep their relative order after the
    /// listed ones; ids from other columns are ignored. Returns the column's
    /// tasks in their new order.
    pub async fn reorder_in_column(
        pool: &PgPool,
        column_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<Vec<ProjectTask>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM project_tasks WHERE column_id = $1 AND deleted_at IS NULL \
             ORDER BY position, id",
        )
        .bind(column_id)
        .fetch_all(&mut *tx)
        .await?;
        let current: Vec<DbId> = current.into_iter().map(|(id,)| id).collect();

        for (id, position) in dense_order(ordered_ids, &current) {
            sqlx::query("UPDATE project_tasks SET position = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Self::list_by_column(pool, column_id).await
    }

    // ── Assignment and status ────────────────────────────────────────

    /// Set or clear the assignee. Returns `None` if the task does not exist.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assignee_id: Option<DbId>,
        assignee_name: Option<&str>,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET assignee_id = $2, assignee_name = $3, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(assignee_id)
            .bind(assignee_name)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the assignee on every live task in `ids`, skipping the rest.
    pub async fn bulk_assign(
        pool: &PgPool,
        ids: &[DbId],
        assignee_id: Option<DbId>,
        assignee_name: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_tasks SET assignee_id = $2, assignee_name = $3, updated_at = NOW() \
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .bind(assignee_id)
        .bind(assignee_name)
        .execute(pool)
        .await?;
        tracing::info!(
            requested = ids.len(),
            updated = result.rows_affected(),
            ?assignee_id,
            "Bulk task assignment"
        );
        Ok(result.rows_affected())
    }

    /// Change a task's status.
    ///
    /// `done`/`completed` (any case) stamp `completed_at`; other statuses
    /// leave an earlier `completed_at` in place.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET
                status = $2,
                completed_at = CASE WHEN $3 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(status)
            .bind(is_terminal_status(status))
            .fetch_optional(pool)
            .await
    }

    /// Apply [`Self::set_status`] to every live task in `ids`, skipping the rest.
    pub async fn bulk_set_status(
        pool: &PgPool,
        ids: &[DbId],
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_tasks SET
                status = $2,
                completed_at = CASE WHEN $3 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .bind(status)
        .bind(is_terminal_status(status))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    /// Make `id` a sub-task of `parent_id`.
    ///
    /// The parent must be a live task of the same project, and the link must
    /// not make a task its own ancestor. Returns `None` if the task does not
    /// exist.
    pub async fn convert_to_sub_task(
        pool: &PgPool,
        id: DbId,
        parent_id: DbId,
    ) -> StoreResult<Option<ProjectTask>> {
        let mut tx = pool.begin().await?;
        let Some(task) = Self::find_in(&mut tx, id).await? else {
            return Ok(None);
        };
        Self::ensure_parent_in_project(&mut tx, parent_id, task.project_id).await?;

        let links: Vec<(DbId, Option<DbId>)> =
            sqlx::query_as("SELECT id, parent_task_id FROM project_tasks WHERE project_id = $1")
                .bind(task.project_id)
                .fetch_all(&mut *tx)
                .await?;
        let parents: HashMap<DbId, Option<DbId>> = links.into_iter().collect();
        if creates_cycle(&parents, id, parent_id) {
            return Err(StoreError::invalid(format!(
                "Task {parent_id} cannot become the parent of task {id}: it would create a cycle"
            )));
        }

        let updated = Self::set_parent_in(&mut tx, id, Some(parent_id)).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Clear a task's parent. Returns `None` if the task does not exist.
    pub async fn convert_to_standalone(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::set_parent_in(&mut conn, id, None).await
    }

    // ── Search and statistics ────────────────────────────────────────

    /// Filtered, paginated task search. Excludes soft-deleted rows.
    pub async fn search(
        pool: &PgPool,
        filter: &TaskFilter,
    ) -> Result<Page<ProjectTask>, sqlx::Error> {
        let page = PageRequest::new(filter.page_number, filter.page_size);
        let pattern = filter.search.as_deref().and_then(contains_pattern);
        let search = pattern.as_deref();

        let count_query = format!("SELECT COUNT(*) {FROM_LIVE} AND {SEARCH_FILTER}");
        let (total,): (i64,) = bind_filter(sqlx::query_as(&count_query), filter, search)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} AND {SEARCH_FILTER} \
             ORDER BY created_at DESC, id DESC LIMIT $7 OFFSET $8"
        );
        let items = bind_filter(sqlx::query_as::<_, ProjectTask>(&page_query), filter, search)
            .bind(page.page_size)
            .bind(page.skip())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, page))
    }

    /// Task statistics for a live project. Returns `None` if it does not exist.
    pub async fn project_stats(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProjectStats>, sqlx::Error> {
        match ProjectRepo::find_by_id(pool, project_id).await? {
            Some(project) => Ok(Some(Self::stats_for(pool, &project).await?)),
            None => Ok(None),
        }
    }

    /// Task statistics for an already-loaded project.
    pub async fn stats_for(pool: &PgPool, project: &Project) -> Result<ProjectStats, sqlx::Error> {
        let (total, completed, overdue): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE completed_at IS NOT NULL),
                    COUNT(*) FILTER (WHERE due_date < NOW() AND completed_at IS NULL)
             FROM project_tasks
             WHERE project_id = $1 AND deleted_at IS NULL",
        )
        .bind(project.id)
        .fetch_one(pool)
        .await?;

        Ok(ProjectStats {
            total_tasks: total,
            completed_tasks: completed,
            overdue_tasks: overdue,
            team_members: project.team_members.len() as i64,
            completion_percentage: completion_percentage(completed, total),
        })
    }

    // ── Connection-level helpers ─────────────────────────────────────

    async fn find_in(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_LIVE} AND id = $1");
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    async fn next_position_in(
        conn: &mut PgConnection,
        column_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position), 0) + 1 \
             FROM project_tasks WHERE column_id = $1 AND deleted_at IS NULL",
        )
        .bind(column_id)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }

    async fn move_in(
        conn: &mut PgConnection,
        id: DbId,
        column_id: DbId,
        position: i32,
    ) -> Result<ProjectTask, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET column_id = $2, position = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(column_id)
            .bind(position)
            .fetch_one(conn)
            .await
    }

    async fn set_parent_in(
        conn: &mut PgConnection,
        id: DbId,
        parent_id: Option<DbId>,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET parent_task_id = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(parent_id)
            .fetch_optional(conn)
            .await
    }

    async fn ensure_column_in_project(
        conn: &mut PgConnection,
        column_id: DbId,
        project_id: DbId,
    ) -> StoreResult<()> {
        match ProjectColumnRepo::find_in(conn, column_id).await? {
            Some(column) if column.project_id == project_id => Ok(()),
            Some(_) => Err(StoreError::invalid(format!(
                "Column {column_id} does not belong to project {project_id}"
            ))),
            None => Err(StoreError::invalid(format!(
                "Column {column_id} does not exist"
            ))),
        }
    }

    async fn ensure_parent_in_project(
        conn: &mut PgConnection,
        parent_id: DbId,
        project_id: DbId,
    ) -> StoreResult<()> {
        match Self::find_in(conn, parent_id).await? {
            Some(parent) if parent.project_id == project_id => Ok(()),
            Some(_) => Err(StoreError::invalid(format!(
                "Parent task {parent_id} belongs to a different project"
            ))),
            None => Err(StoreError::invalid(format!(
                "Parent task {parent_id} does not exist"
            ))),
        }
    }
}

/// Bind `$1..=$6` of [`SEARCH_FILTER`].
fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &'q TaskFilter,
    search: Option<&'q str>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(search)
        .bind(filter.status.as_deref())
        .bind(filter.priority.as_deref())
        .bind(filter.project_id)
        .bind(filter.assignee_id)
        .bind(filter.contact_id)
}
