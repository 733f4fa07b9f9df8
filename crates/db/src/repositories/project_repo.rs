//! Repository for the `projects` table.
//!
//! Owns project CRUD, the board read view, team roster edits, search, and
//! bulk status/archive changes. Creating a project seeds its default
//! columns in the same transaction.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres};
use workdesk_core::pagination::{Page, PageRequest};
use workdesk_core::projects::{
    clamp_progress, dedup_team, has_access, project_order_by, DEFAULT_PROJECT_PRIORITY,
    DEFAULT_PROJECT_STATUS, DEFAULT_PROJECT_TYPE,
};
use workdesk_core::search::contains_pattern;
use workdesk_core::types::DbId;

use crate::error::{validate_input, StoreResult};
use crate::models::project::{
    CreateProject, Project, ProjectBoard, ProjectFilter, UpdateProject,
};
use crate::repositories::{ProjectColumnRepo, ProjectTaskRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, owner_id, owner_name, contact_id, team_members, \
    budget, currency, status, project_type, priority, progress, start_date, end_date, tags, \
    is_archived, created_by, updated_by, deleted_at, created_at, updated_at";

/// Every read goes through this so soft-deleted rows never leak.
const FROM_LIVE: &str = "FROM projects WHERE deleted_at IS NULL";

/// Search predicate; `$1..=$10` are bound by [`bind_filter`].
const SEARCH_FILTER: &str = "\
    ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1) \
    AND ($2::TEXT IS NULL OR status = $2) \
    AND ($3::TEXT IS NULL OR project_type = $3) \
    AND ($4::TEXT IS NULL OR priority = $4) \
    AND ($5::BIGINT IS NULL OR owner_id = $5) \
    AND ($6::BIGINT IS NULL OR contact_id = $6) \
    AND ($7::BIGINT IS NULL OR team_members @> jsonb_build_array($7::BIGINT)) \
    AND ($8::BOOL IS NULL OR is_archived = $8) \
    AND ($9::TIMESTAMPTZ IS NULL OR COALESCE(end_date, start_date) >= $9) \
    AND ($10::TIMESTAMPTZ IS NULL OR COALESCE(start_date, end_date) <= $10)";

/// Provides CRUD and aggregate operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a project and its four default columns in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> StoreResult<Project> {
        validate_input(input)?;
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects
                (name, description, owner_id, owner_name, contact_id, team_members, budget,
                 currency, status, project_type, priority, progress, start_date, end_date,
                 tags, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                     COALESCE($9, '{DEFAULT_PROJECT_STATUS}'),
                     COALESCE($10, '{DEFAULT_PROJECT_TYPE}'),
                     COALESCE($11, '{DEFAULT_PROJECT_PRIORITY}'),
                     COALESCE($12, 0), $13, $14, $15, $16, $16)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.owner_id)
            .bind(&input.owner_name)
            .bind(input.contact_id)
            .bind(Json(dedup_team(&input.team_members)))
            .bind(input.budget)
            .bind(&input.currency)
            .bind(&input.status)
            .bind(&input.project_type)
            .bind(&input.priority)
            .bind(input.progress.map(clamp_progress))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(Json(&input.tags))
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        ProjectColumnRepo::insert_default_columns(&mut tx, project.id).await?;

        tx.commit().await?;
        tracing::info!(
            project_id = project.id,
            owner_id = project.owner_id,
            "Created project"
        );
        Ok(project)
    }

    /// Find a project by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_LIVE} AND id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        validate_input(input)?;
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                contact_id = COALESCE($4, contact_id),
                team_members = COALESCE($5, team_members),
                budget = COALESCE($6, budget),
                currency = COALESCE($7, currency),
                status = COALESCE($8, status),
                project_type = COALESCE($9, project_type),
                priority = COALESCE($10, priority),
                progress = COALESCE($11, progress),
                start_date = COALESCE($12, start_date),
                end_date = COALESCE($13, end_date),
                tags = COALESCE($14, tags),
                is_archived = COALESCE($15, is_archived),
                updated_by = COALESCE($16, updated_by),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.contact_id)
            .bind(input.team_members.as_deref().map(|t| Json(dedup_team(t))))
            .bind(input.budget)
            .bind(&input.currency)
            .bind(&input.status)
            .bind(&input.project_type)
            .bind(&input.priority)
            .bind(input.progress.map(clamp_progress))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.tags.as_ref().map(Json))
            .bind(input.is_archived)
            .bind(input.updated_by)
            .fetch_optional(pool)
            .await?;
        Ok(project)
    }

    /// Soft-delete a project by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted project. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Aggregate view ───────────────────────────────────────────────

    /// Load a project with its ordered columns (with task counts) and
    /// statistics. Returns `None` if the project is absent or deleted.
    pub async fn find_with_board(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectBoard>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let columns = ProjectColumnRepo::list_by_project(pool, id).await?;
        let stats = ProjectTaskRepo::stats_for(pool, &project).await?;
        Ok(Some(ProjectBoard {
            project,
            columns,
            stats,
        }))
    }

    // ── Team roster ──────────────────────────────────────────────────

    /// Team member ids of a live project.
    pub async fn team_members(pool: &PgPool, id: DbId) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        Ok(Self::find_by_id(pool, id).await?.map(|p| p.team_members))
    }

    /// Add a user to the team. Adding a present member changes nothing.
    ///
    /// The roster is edited in a single statement so concurrent adds cannot
    /// drop each other. Returns the resulting roster, or `None` if the
    /// project does not exist.
    pub async fn add_team_member(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let added = sqlx::query_scalar::<_, Json<Vec<DbId>>>(
            "UPDATE projects SET
                team_members = team_members || jsonb_build_array($2::BIGINT),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
               AND NOT team_members @> jsonb_build_array($2::BIGINT)
             RETURNING team_members",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        match added {
            Some(Json(team)) => Ok(Some(team)),
            None => Self::team_members(pool, id).await,
        }
    }

    /// Remove a user from the team. Removing an absent member changes nothing.
    ///
    /// Returns the resulting roster, or `None` if the project does not exist.
    pub async fn remove_team_member(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let removed = sqlx::query_scalar::<_, Json<Vec<DbId>>>(
            "UPDATE projects SET
                team_members = COALESCE(
                    (SELECT jsonb_agg(member ORDER BY idx)
                     FROM jsonb_array_elements(team_members) WITH ORDINALITY AS t(member, idx)
                     WHERE member <> to_jsonb($2::BIGINT)),
                    '[]'::jsonb),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
               AND team_members @> jsonb_build_array($2::BIGINT)
             RETURNING team_members",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        match removed {
            Some(Json(team)) => Ok(Some(team)),
            None => Self::team_members(pool, id).await,
        }
    }

    /// Whether `user_id` owns or is on the team of a live project. Unknown
    /// projects grant no access.
    pub async fn user_has_access(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        Ok(Self::find_by_id(pool, id)
            .await?
            .is_some_and(|p| has_access(p.owner_id, &p.team_members, user_id)))
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Filtered, sorted, paginated project search. Excludes soft-deleted rows.
    pub async fn search(
        pool: &PgPool,
        filter: &ProjectFilter,
    ) -> Result<Page<Project>, sqlx::Error> {
        let page = PageRequest::new(filter.page_number, filter.page_size);
        let pattern = filter.search.as_deref().and_then(contains_pattern);
        let search = pattern.as_deref();

        let count_query = format!("SELECT COUNT(*) {FROM_LIVE} AND {SEARCH_FILTER}");
        let (total,): (i64,) = bind_filter(sqlx::query_as(&count_query), filter, search)
            .fetch_one(pool)
            .await?;

        let order_by =
            project_order_by(filter.sort_by.as_deref(), filter.sort_desc.unwrap_or(false));
        let page_query = format!(
            "SELECT {COLUMNS} {FROM_LIVE} AND {SEARCH_FILTER} \
             ORDER BY {order_by} LIMIT $11 OFFSET $12"
        );
        let items = bind_filter(sqlx::query_as::<_, Project>(&page_query), filter, search)
            .bind(page.page_size)
            .bind(page.skip())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, page))
    }

    // ── Bulk operations ──────────────────────────────────────────────

    /// Set the status of every live project in `ids`; unknown or deleted ids
    /// are skipped. A single statement, so the batch applies atomically.
    pub async fn bulk_update_status(
        pool: &PgPool,
        ids: &[DbId],
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET status = $2, updated_at = NOW() \
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .bind(status)
        .execute(pool)
        .await?;
        tracing::info!(
            requested = ids.len(),
            updated = result.rows_affected(),
            %status,
            "Bulk project status update"
        );
        Ok(result.rows_affected())
    }

    /// Archive or unarchive every live project in `ids`; unknown or deleted
    /// ids are skipped.
    pub async fn bulk_set_archived(
        pool: &PgPool,
        ids: &[DbId],
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET is_archived = $2, updated_at = NOW() \
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .bind(archived)
        .execute(pool)
        .await?;
        tracing::info!(
            requested = ids.len(),
            updated = result.rows_affected(),
            archived,
            "Bulk project archive update"
        );
        Ok(result.rows_affected())
    }

    // ── Connection-level helpers ─────────────────────────────────────

    /// Whether a live project with this id exists.
    pub(crate) async fn exists_in(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }
}

/// Bind `$1..=$10` of [`SEARCH_FILTER`].
fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &'q ProjectFilter,
    search: Option<&'q str>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(search)
        .bind(filter.status.as_deref())
        .bind(filter.project_type.as_deref())
        .bind(filter.priority.as_deref())
        .bind(filter.owner_id)
        .bind(filter.contact_id)
        .bind(filter.team_member_id)
        .bind(filter.is_archived)
        .bind(filter.date_from)
        .bind(filter.date_to)
}
