//! Repository for the `daily_tasks` table.
//!
//! Daily tasks form one ordered list per user; positions follow the same
//! append-and-renumber rules as board tasks.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres};
use workdesk_core::pagination::{Page, PageRequest};
use workdesk_core::search::contains_pattern;
use workdesk_core::tasks::{
    dense_order, is_terminal_status, DEFAULT_TASK_PRIORITY, DEFAULT_TASK_STATUS,
};
use workdesk_core::types::DbId;

use crate::error::{validate_input, StoreResult};
use crate::models::daily_task::{CreateDailyTask, DailyTask, DailyTaskFilter, UpdateDailyTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, user_name, title, description, status, priority, position, \
    due_date, start_date, completed_at, estimated_hours, actual_hours, tags, deleted_at, \
    created_at, updated_at";

const FROM_LIVE: &str = "FROM daily_tasks WHERE deleted_at IS NULL";

/// Search predicate; `$1..=$4` are bound by [`bind_filter`].
const SEARCH_FILTER: &str = "\
    ($1::BIGINT IS NULL OR user_id = $1) \
    AND ($2::TEXT IS NULL OR title ILIKE $2 OR description ILIKE $2) \
    AND ($3::TEXT IS NULL OR status = $3) \
    AND ($4::TEXT IS NULL OR priority = $4)";

/// Provides CRUD and ordering for a user's daily tasks.
pub struct DailyTaskRepo;

impl DailyTaskRepo {
    /// Position a new task for this user would receive (1 when empty).
    pub async fn next_position(pool: &PgPool, user_id: DbId) -> Result<i32, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::next_position_in(&mut conn, user_id).await
    }

    /// Insert a daily task at the end of the user's list.
    pub async fn create(pool: &PgPool, input: &CreateDailyTask) -> StoreResult<DailyTask> {
        validate_input(input)?;
        let mut tx = pool.begin().await?;
        let position = Self::next_position_in(&mut tx, input.user_id).await?;
        let completed = input.status.as_deref().is_some_and(is_terminal_status);

        let query = format!(
            "INSERT INTO daily_tasks
                (user_id, user_name, title, description, status, priority, position,
                 due_date, start_date, completed_at, estimated_hours, tags)
             VALUES ($1, $2, $3, $4,
                     COALESCE($5, '{DEFAULT_TASK_STATUS}'),
                     COALESCE($6, '{DEFAULT_TASK_PRIORITY}'),
                     $7, $8, $9, CASE WHEN $10 THEN NOW() END, $11, $12)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, DailyTask>(&query)
            .bind(input.user_id)
            .bind(&input.user_name)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(position)
            .bind(input.due_date)
            .bind(input.start_date)
            .bind(completed)
            .bind(input.estimated_hours)
            .bind(Json(&input.tags))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Find a live daily task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DailyTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_LIVE} AND id = $1");
        sqlx::query_as::<_, DailyTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's live daily tasks in list order.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<DailyTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_LIVE} AND user_id = $1 ORDER BY position, id");
        sqlx::query_as::<_, DailyTask>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a daily task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live task with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDailyTask,
    ) -> StoreResult<Option<DailyTask>> {
        validate_input(input)?;
        let completed = input.status.as_deref().is_some_and(is_terminal_status);
        let query = format!(
            "UPDATE daily_tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                start_date = COALESCE($7, start_date),
                estimated_hours = COALESCE($8, estimated_hours),
                actual_hours = COALESCE($9, actual_hours),
                tags = COALESCE($10, tags),
                completed_at = CASE WHEN $11 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, DailyTask>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.start_date)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(input.tags.as_ref().map(Json))
            .bind(completed)
            .fetch_optional(pool)
            .await?;
        Ok(task)
    }

    /// Change status; `done`/`completed` stamp `completed_at`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<DailyTask>, sqlx::Error> {
        let query = format!(
            "UPDATE daily_tasks SET
                status = $2,
                completed_at = CASE WHEN $3 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyTask>(&query)
            .bind(id)
            .bind(status)
            .bind(is_terminal_status(status))
            .fetch_optional(pool)
            .await
    }

    /// Renumber a user's live tasks 1..n with `ordered_ids` first.
    ///
    /// Ids belonging to other users are ignored.
    pub async fn reorder(
        pool: &PgPool,
        user_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<Vec<DailyTask>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM daily_tasks WHERE user_id = $1 AND deleted_at IS NULL \
             ORDER BY position, id",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;
        let current: Vec<DbId> = current.into_iter().map(|(id,)| id).collect();

        for (id, position) in dense_order(ordered_ids, &current) {
            sqlx::query("UPDATE daily_tasks SET position = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Self::list_by_user(pool, user_id).await
    }

    /// Soft-delete a daily task. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE daily_tasks SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Filtered, paginated search ordered by user then list position.
    pub async fn search(
        pool: &PgPool,
        filter: &DailyTaskFilter,
    ) -> Result<Page<DailyTask>, sqlx::Error> {
        let page = PageRequest::new(filter.page_number, filter.page_size);
        let pattern = filter.search.as_deref().and_then(contains_pattern);
        let search = pattern.as_deref();

        let count_query = format!("SELECT COUNT(*) {FROM_LIVE} AND {SEARCH_FILTER}");
        let (total,): (i64,) = bind_filter(sqlx::query_as(&count_query), filter, search)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} AND {SEARCH_FILTER} \
             ORDER BY user_id, position, id LIMIT $5 OFFSET $6"
        );
        let items = bind_filter(sqlx::query_as::<_, DailyTask>(&page_query), filter, search)
            .bind(page.page_size)
            .bind(page.skip())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, page))
    }

    async fn next_position_in(conn: &mut PgConnection, user_id: DbId) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position), 0) + 1 \
             FROM daily_tasks WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }
}

fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &'q DailyTaskFilter,
    search: Option<&'q str>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(filter.user_id)
        .bind(search)
        .bind(filter.status.as_deref())
        .bind(filter.priority.as_deref())
}
