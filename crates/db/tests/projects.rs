//! Integration tests for the project aggregate.
//!
//! Exercises `ProjectRepo` against a real database:
//! - Creating a project seeds the four default columns
//! - Board view and statistics
//! - Team roster edits are idempotent and safe under concurrency
//! - Owner/team access rule
//! - Soft delete / restore
//! - Search filters (text, team, date window), sorting, and pagination
//! - Bulk status and archive changes

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use workdesk_core::error::CoreError;
use workdesk_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
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

// ---------------------------------------------------------------------------
// Create and defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_seeds_default_columns(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Website")).await.unwrap();

    assert_eq!(project.status, "active");
    assert_eq!(project.project_type, "internal");
    assert_eq!(project.priority, "medium");
    assert_eq!(project.progress, 0);
    assert!(!project.is_archived);

    let columns = ProjectColumnRepo::list_by_project(&pool, project.id).await.unwrap();
    let titles: Vec<&str> = columns.iter().map(|c| c.column.title.as_str()).collect();
    assert_eq!(titles, vec!["To Do", "In Progress", "Review", "Done"]);
    let positions: Vec<i32> = columns.iter().map(|c| c.column.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert!(columns.iter().all(|c| c.column.is_default && c.task_count == 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_clamps_progress_and_dedups_team(pool: PgPool) {
    let mut input = new_project("Clamp");
    input.progress = Some(140);
    input.team_members = vec![5, 6, 5];
    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    assert_eq!(project.progress, 100);
    assert_eq!(project.team_members, vec![5, 6]);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_rejects_empty_name(pool: PgPool) {
    let result = ProjectRepo::create(&pool, &new_project("")).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_given_fields(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Before")).await.unwrap();

    let update = UpdateProject {
        name: Some("After".to_string()),
        progress: Some(-3),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, project.id, &update)
        .await
        .unwrap()
        .expect("project should exist");

    assert_eq!(updated.name, "After");
    assert_eq!(updated.progress, 0);
    assert_eq!(updated.owner_name, "Owner");
}

// ---------------------------------------------------------------------------
// Board view and statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn board_stats_count_completed_and_overdue(pool: PgPool) {
    let mut input = new_project("Stats");
    input.team_members = vec![2, 3];
    let project = ProjectRepo::create(&pool, &input).await.unwrap();
    let columns = ProjectColumnRepo::list_by_project(&pool, project.id).await.unwrap();
    let todo = columns[0].column.id;

    let done = ProjectTaskRepo::create(&pool, &new_task(project.id, todo, "Done"))
        .await
        .unwrap();
    ProjectTaskRepo::set_status(&pool, done.id, "Done").await.unwrap();

    let mut overdue = new_task(project.id, todo, "Late");
    overdue.due_date = Some(Utc::now() - Duration::days(2));
    ProjectTaskRepo::create(&pool, &overdue).await.unwrap();

    ProjectTaskRepo::create(&pool, &new_task(project.id, todo, "Open 1")).await.unwrap();
    ProjectTaskRepo::create(&pool, &new_task(project.id, todo, "Open 2")).await.unwrap();

    let board = ProjectRepo::find_with_board(&pool, project.id)
        .await
        .unwrap()
        .expect("board should exist");

    assert_eq!(board.stats.total_tasks, 4);
    assert_eq!(board.stats.completed_tasks, 1);
    assert_eq!(board.stats.overdue_tasks, 1);
    assert_eq!(board.stats.team_members, 2);
    assert_eq!(board.stats.completion_percentage, 25.0);
    assert_eq!(board.columns[0].task_count, 4);
    assert_eq!(board.columns[1].task_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_for_empty_project_are_zero(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Empty")).await.unwrap();
    let stats = ProjectTaskRepo::project_stats(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.completion_percentage, 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn board_of_missing_project_is_none(pool: PgPool) {
    assert!(ProjectRepo::find_with_board(&pool, 999_999).await.unwrap().is_none());
    assert!(ProjectTaskRepo::project_stats(&pool, 999_999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Team roster
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn add_twice_then_remove_leaves_no_trace(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Team")).await.unwrap();

    let team = ProjectRepo::add_team_member(&pool, project.id, 42).await.unwrap().unwrap();
    assert_eq!(team, vec![42]);
    let team = ProjectRepo::add_team_member(&pool, project.id, 42).await.unwrap().unwrap();
    assert_eq!(team, vec![42]);

    let team = ProjectRepo::remove_team_member(&pool, project.id, 42).await.unwrap().unwrap();
    assert!(team.is_empty());
    let team = ProjectRepo::remove_team_member(&pool, project.id, 42).await.unwrap().unwrap();
    assert!(team.is_empty());

    let stored = ProjectRepo::team_members(&pool, project.id).await.unwrap().unwrap();
    assert!(stored.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn team_edit_on_missing_project_is_none(pool: PgPool) {
    assert!(ProjectRepo::add_team_member(&pool, 999_999, 1).await.unwrap().is_none());
    assert!(ProjectRepo::remove_team_member(&pool, 999_999, 1).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_adds_keep_every_member(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Crowd")).await.unwrap();

    let adds = (1..=8).map(|user_id| ProjectRepo::add_team_member(&pool, project.id, user_id));
    for result in futures::future::join_all(adds).await {
        assert!(result.unwrap().is_some());
    }

    let mut team = ProjectRepo::team_members(&pool, project.id).await.unwrap().unwrap();
    team.sort_unstable();
    assert_eq!(team, (1..=8).collect::<Vec<_>>());
}

#[sqlx::test(migrations = "./migrations")]
async fn remove_keeps_order_of_remaining_members(pool: PgPool) {
    let mut input = new_project("Order");
    input.team_members = vec![9, 4, 6];
    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    let team = ProjectRepo::remove_team_member(&pool, project.id, 4).await.unwrap().unwrap();
    assert_eq!(team, vec![9, 6]);
    let team = ProjectRepo::add_team_member(&pool, project.id, 4).await.unwrap().unwrap();
    assert_eq!(team, vec![9, 6, 4]);
}

#[sqlx::test(migrations = "./migrations")]
async fn owner_and_team_have_access(pool: PgPool) {
    let mut input = new_project("Access");
    input.team_members = vec![2];
    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    assert!(ProjectRepo::user_has_access(&pool, project.id, 1).await.unwrap());
    assert!(ProjectRepo::user_has_access(&pool, project.id, 2).await.unwrap());
    assert!(!ProjectRepo::user_has_access(&pool, project.id, 3).await.unwrap());
    assert!(!ProjectRepo::user_has_access(&pool, 999_999, 1).await.unwrap());

    ProjectRepo::soft_delete(&pool, project.id).await.unwrap();
    assert!(!ProjectRepo::user_has_access(&pool, project.id, 1).await.unwrap());
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn soft_delete_hides_and_restore_returns(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Hidden")).await.unwrap();

    assert!(ProjectRepo::soft_delete(&pool, project.id).await.unwrap());
    assert!(!ProjectRepo::soft_delete(&pool, project.id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());

    assert!(ProjectRepo::restore(&pool, project.id).await.unwrap());
    assert!(!ProjectRepo::restore(&pool, project.id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn search_filters_text_and_team(pool: PgPool) {
    let mut alpha = new_project("Alpha launch");
    alpha.team_members = vec![7];
    ProjectRepo::create(&pool, &alpha).await.unwrap();
    ProjectRepo::create(&pool, &new_project("Beta launch")).await.unwrap();
    let gone = ProjectRepo::create(&pool, &new_project("Gamma launch")).await.unwrap();
    ProjectRepo::soft_delete(&pool, gone.id).await.unwrap();

    let filter = ProjectFilter {
        search: Some("LAUNCH".to_string()),
        ..Default::default()
    };
    let page = ProjectRepo::search(&pool, &filter).await.unwrap();
    assert_eq!(page.total_count, 2);

    let filter = ProjectFilter {
        team_member_id: Some(7),
        ..Default::default()
    };
    let page = ProjectRepo::search(&pool, &filter).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].name, "Alpha launch");
}

#[sqlx::test(migrations = "./migrations")]
async fn search_treats_wildcards_literally(pool: PgPool) {
    ProjectRepo::create(&pool, &new_project("100% done")).await.unwrap();
    ProjectRepo::create(&pool, &new_project("1000 done")).await.unwrap();
    ProjectRepo::create(&pool, &new_project("snake_case")).await.unwrap();
    ProjectRepo::create(&pool, &new_project("snakeXcase")).await.unwrap();

    let by_text = |text: &str| ProjectFilter {
        search: Some(text.to_string()),
        ..Default::default()
    };

    let page = ProjectRepo::search(&pool, &by_text("0%")).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].name, "100% done");

    let page = ProjectRepo::search(&pool, &by_text("e_c")).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].name, "snake_case");
}

#[sqlx::test(migrations = "./migrations")]
async fn search_date_window_matches_overlapping_projects(pool: PgPool) {
    let now = Utc::now();
    let dated = |name: &str, start: Option<i64>, end: Option<i64>| {
        let mut input = new_project(name);
        input.start_date = start.map(|d| now + Duration::days(d));
        input.end_date = end.map(|d| now + Duration::days(d));
        input
    };
    for input in [
        dated("Inside", Some(12), Some(15)),
        dated("Straddling", Some(5), Some(25)),
        dated("Start only", Some(11), None),
        dated("Earlier", Some(-10), Some(0)),
        dated("Later", Some(30), Some(40)),
        dated("Undated", None, None),
    ] {
        ProjectRepo::create(&pool, &input).await.unwrap();
    }

    let window = ProjectFilter {
        date_from: Some(now + Duration::days(10)),
        date_to: Some(now + Duration::days(20)),
        sort_by: Some("name".to_string()),
        ..Default::default()
    };
    let page = ProjectRepo::search(&pool, &window).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Inside", "Start only", "Straddling"]);

    let open_ended = ProjectFilter {
        date_to: None,
        ..window
    };
    let page = ProjectRepo::search(&pool, &open_ended).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Inside", "Later", "Start only", "Straddling"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_far_past_the_end_is_empty(pool: PgPool) {
    ProjectRepo::create(&pool, &new_project("Only")).await.unwrap();

    let filter = ProjectFilter {
        page_number: Some(i64::MAX),
        page_size: Some(20),
        ..Default::default()
    };
    let page = ProjectRepo::search(&pool, &filter).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 1);
    assert!(!page.has_next_page);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_sorts_and_paginates(pool: PgPool) {
    for name in ["Charlie", "Alpha", "Bravo"] {
        ProjectRepo::create(&pool, &new_project(name)).await.unwrap();
    }

    let filter = ProjectFilter {
        sort_by: Some("name".to_string()),
        page_number: Some(1),
        page_size: Some(2),
        ..Default::default()
    };
    let page = ProjectRepo::search(&pool, &filter).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_next_page);
    assert!(!page.has_previous_page);

    let filter = ProjectFilter {
        page_number: Some(2),
        ..filter
    };
    let page = ProjectRepo::search(&pool, &filter).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Charlie");
    assert!(!page.has_next_page);
    assert!(page.has_previous_page);
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn bulk_status_skips_unknown_ids(pool: PgPool) {
    let a = ProjectRepo::create(&pool, &new_project("A")).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("B")).await.unwrap();

    let updated = ProjectRepo::bulk_update_status(&pool, &[a.id, b.id, 999_999], "on_hold")
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let a = ProjectRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(a.status, "on_hold");

    let archived = ProjectRepo::bulk_set_archived(&pool, &[a.id], true).await.unwrap();
    assert_eq!(archived, 1);

    let filter = ProjectFilter {
        is_archived: Some(true),
        ..Default::default()
    };
    let page = ProjectRepo::search(&pool, &filter).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].id, a.id);
}
