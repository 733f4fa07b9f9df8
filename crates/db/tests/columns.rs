//! Integration tests for board columns.
//!
//! Covers column creation, default-column seeding, deletion with and without a move target,
//! bulk deletion guards, `can_delete`, and reordering.

use assert_matches::assert_matches;
use sqlx::PgPool;
use workdesk_core::error::CoreError;
use workdesk_db::models::column::{ColumnPosition, CreateColumn, UpdateColumn};
use workdesk_db::models::project::CreateProject;
use workdesk_db::models::task::CreateProjectTask;
use workdesk_db::repositories::{ProjectColumnRepo, ProjectRepo, ProjectTaskRepo};
use workdesk_db::StoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        owner_id: 1,
        owner_name: "Owner".to_string(),
        contact_id: None,
        team_members: Vec::new(),
        budget: None,
        currency: None,
        status: None,
        project_type: None,
        priority: None,
        progress: None,
        start_date: None,
        end_date: None,
        tags: Vec::new(),
        created_by: None,
    }
}

fn new_task(project_id: i64, column_id: i64, title: &str) -> CreateProjectTask {
    CreateProjectTask {
        project_id,
        column_id,
        title: title.to_string(),
        description: None,
        contact_id: None,
        assignee_id: None,
        assignee_name: None,
        status: None,
        priority: None,
        parent_task_id: None,
        due_date: None,
        start_date: None,
        estimated_hours: None,
        tags: Vec::new(),
        created_by: None,
    }
}

fn new_column(project_id: i64, title: &str) -> CreateColumn {
    CreateColumn {
        project_id,
        title: title.to_string(),
        color: None,
        position: None,
        is_default: None,
        task_limit: None,
    }
}

/// Create a project and return `(project_id, [column ids in board order])`.
async fn seed_board(pool: &PgPool, name: &str) -> (i64, Vec<i64>) {
    let project = ProjectRepo::create(pool, &new_project(name)).await.unwrap();
    let columns = ProjectColumnRepo::list_by_project(pool, project.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.column.id)
        .collect();
    (project.id, columns)
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_appends_after_last_column(pool: PgPool) {
    let (project_id, _) = seed_board(&pool, "Append").await;

    let column = ProjectColumnRepo::create(&pool, &new_column(project_id, "Blocked"))
        .await
        .unwrap();
    assert_eq!(column.position, 5);
    assert_eq!(column.color, "#6B7280");
    assert!(!column.is_default);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_on_missing_project_is_not_found(pool: PgPool) {
    let result = ProjectColumnRepo::create(&pool, &new_column(999_999, "Orphan")).await;
    assert_matches!(
        result,
        Err(StoreError::Core(CoreError::NotFound { entity: "Project", .. }))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn default_columns_can_be_seeded_again(pool: PgPool) {
    let (project_id, first_seed) = seed_board(&pool, "Reseed").await;

    let seeded = ProjectColumnRepo::create_default_columns(&pool, project_id)
        .await
        .unwrap();
    let titles: Vec<&str> = seeded.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["To Do", "In Progress", "Review", "Done"]);
    assert!(seeded.iter().all(|c| c.is_default && c.project_id == project_id));
    assert!(seeded.iter().all(|c| !first_seed.contains(&c.id)));

    let columns = ProjectColumnRepo::list_by_project(&pool, project_id).await.unwrap();
    assert_eq!(columns.len(), 8);
}

#[sqlx::test(migrations = "./migrations")]
async fn default_columns_need_a_live_project(pool: PgPool) {
    let result = ProjectColumnRepo::create_default_columns(&pool, 999_999).await;
    assert_matches!(
        result,
        Err(StoreError::Core(CoreError::NotFound { entity: "Project", .. }))
    );

    let (project_id, _) = seed_board(&pool, "Gone").await;
    ProjectRepo::soft_delete(&pool, project_id).await.unwrap();
    let result = ProjectColumnRepo::create_default_columns(&pool, project_id).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::NotFound { .. })));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_changes_title_only(pool: PgPool) {
    let (_, columns) = seed_board(&pool, "Rename").await;
    let update = UpdateColumn {
        title: Some("Backlog".to_string()),
        ..Default::default()
    };
    let column = ProjectColumnRepo::update(&pool, columns[0], &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(column.title, "Backlog");
    assert_eq!(column.position, 1);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_with_target_moves_tasks_to_end(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Move").await;
    let (source, target) = (columns[0], columns[1]);

    ProjectTaskRepo::create(&pool, &new_task(project_id, target, "Existing")).await.unwrap();
    let a = ProjectTaskRepo::create(&pool, &new_task(project_id, source, "A")).await.unwrap();
    let b = ProjectTaskRepo::create(&pool, &new_task(project_id, source, "B")).await.unwrap();

    assert!(ProjectColumnRepo::delete(&pool, source, Some(target)).await.unwrap());
    assert!(ProjectColumnRepo::find_by_id(&pool, source).await.unwrap().is_none());

    let tasks = ProjectTaskRepo::list_by_column(&pool, target).await.unwrap();
    let order: Vec<(&str, i32)> = tasks.iter().map(|t| (t.title.as_str(), t.position)).collect();
    assert_eq!(order, vec![("Existing", 1), ("A", 2), ("B", 3)]);
    assert!(tasks.iter().any(|t| t.id == a.id));
    assert!(tasks.iter().any(|t| t.id == b.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_without_target_soft_deletes_tasks(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Drop").await;
    let task = ProjectTaskRepo::create(&pool, &new_task(project_id, columns[0], "Doomed"))
        .await
        .unwrap();

    assert!(ProjectColumnRepo::delete(&pool, columns[0], None).await.unwrap());
    assert!(ProjectTaskRepo::find_by_id(&pool, task.id).await.unwrap().is_none());

    let (deleted_at,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT deleted_at FROM project_tasks WHERE id = $1")
            .bind(task.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(deleted_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_missing_column_returns_false(pool: PgPool) {
    assert!(!ProjectColumnRepo::delete(&pool, 999_999, None).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_rejects_foreign_target_and_keeps_column(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Mine").await;
    let (_, other_columns) = seed_board(&pool, "Theirs").await;
    ProjectTaskRepo::create(&pool, &new_task(project_id, columns[0], "Stay")).await.unwrap();

    let result = ProjectColumnRepo::delete(&pool, columns[0], Some(other_columns[0])).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    assert!(ProjectColumnRepo::find_by_id(&pool, columns[0]).await.unwrap().is_some());
    assert_eq!(ProjectColumnRepo::task_count(&pool, columns[0]).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn can_delete_requires_another_column(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Guard").await;
    assert!(ProjectColumnRepo::can_delete(&pool, columns[0]).await.unwrap());
    assert!(!ProjectColumnRepo::can_delete(&pool, 999_999).await.unwrap());

    let removed = ProjectColumnRepo::delete_many(&pool, project_id, &columns[1..], None)
        .await
        .unwrap();
    assert_eq!(removed, 3);
    assert!(!ProjectColumnRepo::can_delete(&pool, columns[0]).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_many_refuses_to_empty_project(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Empty").await;
    let result = ProjectColumnRepo::delete_many(&pool, project_id, &columns, None).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::InvalidOperation(_))));
    let remaining = ProjectColumnRepo::list_by_project(&pool, project_id).await.unwrap();
    assert_eq!(remaining.len(), 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_many_rolls_back_on_foreign_column(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Mine").await;
    let (_, other_columns) = seed_board(&pool, "Theirs").await;

    let result =
        ProjectColumnRepo::delete_many(&pool, project_id, &[columns[1], other_columns[0]], None)
            .await;
    assert_matches!(result, Err(StoreError::Core(CoreError::InvalidOperation(_))));
    assert!(ProjectColumnRepo::find_by_id(&pool, columns[1]).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reorder_applies_positions(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Order").await;
    let positions = vec![
        ColumnPosition { column_id: columns[0], position: 4 },
        ColumnPosition { column_id: columns[3], position: 1 },
    ];
    ProjectColumnRepo::reorder(&pool, project_id, &positions).await.unwrap();

    let ordered: Vec<i64> = ProjectColumnRepo::list_by_project(&pool, project_id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.column.id)
        .collect();
    assert_eq!(ordered, vec![columns[3], columns[1], columns[2], columns[0]]);
}

#[sqlx::test(migrations = "./migrations")]
async fn reorder_with_foreign_column_changes_nothing(pool: PgPool) {
    let (project_id, columns) = seed_board(&pool, "Mine").await;
    let (_, other_columns) = seed_board(&pool, "Theirs").await;
    let positions = vec![
        ColumnPosition { column_id: columns[0], position: 9 },
        ColumnPosition { column_id: other_columns[0], position: 1 },
    ];

    let result = ProjectColumnRepo::reorder(&pool, project_id, &positions).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    let first = ProjectColumnRepo::find_by_id(&pool, columns[0]).await.unwrap().unwrap();
    assert_eq!(first.position, 1);
}
