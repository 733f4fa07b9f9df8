//! Integration tests for task comments and attachments.
//!
//! Both hang off exactly one live task. Attachments additionally check
//! MIME type and size before anything is written.

use assert_matches::assert_matches;
use sqlx::PgPool;
use workdesk_core::error::CoreError;
use workdesk_core::task_ref::TaskRef;
use workdesk_db::models::attachment::{CreateTaskAttachment, UpdateTaskAttachment};
use workdesk_db::models::comment::{CreateTaskComment, UpdateTaskComment};
use workdesk_db::models::daily_task::CreateDailyTask;
use workdesk_db::models::project::CreateProject;
use workdesk_db::models::task::CreateProjectTask;
use workdesk_db::repositories::{
    DailyTaskRepo, ProjectColumnRepo, ProjectRepo, ProjectTaskRepo, TaskAttachmentRepo,
    TaskCommentRepo,
};
use workdesk_db::StoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a project with one task and return the task id.
async fn seed_project_task(pool: &PgPool) -> i64 {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Notes".to_string(),
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
        },
    )
    .await
    .unwrap();
    let columns = ProjectColumnRepo::list_by_project(pool, project.id).await.unwrap();
    let task = ProjectTaskRepo::create(
        pool,
        &CreateProjectTask {
            project_id: project.id,
            column_id: columns[0].column.id,
            title: "Commented".to_string(),
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
        },
    )
    .await
    .unwrap();
    task.id
}

async fn seed_daily_task(pool: &PgPool) -> i64 {
    DailyTaskRepo::create(
        pool,
        &CreateDailyTask {
            user_id: 10,
            user_name: "Sam".to_string(),
            title: "Inbox zero".to_string(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            start_date: None,
            estimated_hours: None,
            tags: Vec::new(),
        },
    )
    .await
    .unwrap()
    .id
}

fn comment(
    project_task_id: Option<i64>,
    daily_task_id: Option<i64>,
    content: &str,
) -> CreateTaskComment {
    CreateTaskComment {
        project_task_id,
        daily_task_id,
        content: content.to_string(),
        author_id: 3,
        author_name: "Ari".to_string(),
    }
}

fn attachment(
    project_task_id: Option<i64>,
    mime_type: &str,
    file_size: i64,
) -> CreateTaskAttachment {
    CreateTaskAttachment {
        project_task_id,
        daily_task_id: None,
        file_name: "file.bin".to_string(),
        file_url: "https://files.example.test/file.bin".to_string(),
        mime_type: mime_type.to_string(),
        file_size,
        caption: None,
        uploaded_by: 3,
        uploaded_by_name: "Ari".to_string(),
    }
}

async fn attachment_count(pool: &PgPool) -> i64 {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_attachments")
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn comments_list_newest_first(pool: PgPool) {
    let task_id = seed_project_task(&pool).await;
    let first = TaskCommentRepo::create(&pool, &comment(Some(task_id), None, "first"))
        .await
        .unwrap();
    let second = TaskCommentRepo::create(&pool, &comment(Some(task_id), None, "second"))
        .await
        .unwrap();

    let listed = TaskCommentRepo::list_for_task(&pool, TaskRef::Project(task_id)).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(
        TaskCommentRepo::count_for_task(&pool, TaskRef::Project(task_id)).await.unwrap(),
        2
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn comment_needs_exactly_one_task(pool: PgPool) {
    let task_id = seed_project_task(&pool).await;
    let daily_id = seed_daily_task(&pool).await;

    let both = TaskCommentRepo::create(&pool, &comment(Some(task_id), Some(daily_id), "x")).await;
    assert_matches!(both, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    let neither = TaskCommentRepo::create(&pool, &comment(None, None, "x")).await;
    assert_matches!(neither, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    let missing = TaskCommentRepo::create(&pool, &comment(Some(999_999), None, "x")).await;
    assert_matches!(missing, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    let on_daily = TaskCommentRepo::create(&pool, &comment(None, Some(daily_id), "ok"))
        .await
        .unwrap();
    assert_eq!(on_daily.daily_task_id, Some(daily_id));
    assert!(on_daily.project_task_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn comment_on_deleted_task_is_rejected(pool: PgPool) {
    let task_id = seed_project_task(&pool).await;
    ProjectTaskRepo::soft_delete(&pool, task_id).await.unwrap();

    let result = TaskCommentRepo::create(&pool, &comment(Some(task_id), None, "late")).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::InvalidOperation(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn comment_edit_and_soft_delete(pool: PgPool) {
    let task_id = seed_project_task(&pool).await;
    let created = TaskCommentRepo::create(&pool, &comment(Some(task_id), None, "draft"))
        .await
        .unwrap();

    let edited = TaskCommentRepo::update(
        &pool,
        created.id,
        &UpdateTaskComment { content: "final".to_string() },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(edited.content, "final");

    let blank = UpdateTaskComment {
        content: String::new(),
    };
    let empty = TaskCommentRepo::update(&pool, created.id, &blank).await;
    assert_matches!(empty, Err(StoreError::Core(CoreError::Validation(_))));

    assert!(TaskCommentRepo::soft_delete(&pool, created.id).await.unwrap());
    assert!(TaskCommentRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert!(TaskCommentRepo::list_for_task(&pool, TaskRef::Project(task_id))
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn disallowed_type_or_size_persists_nothing(pool: PgPool) {
    let task_id = seed_project_task(&pool).await;

    let exe = attachment(Some(task_id), "application/x-msdownload", 100);
    let exe = TaskAttachmentRepo::create(&pool, &exe).await;
    assert_matches!(exe, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    let huge = attachment(Some(task_id), "image/png", 11_000_000);
    let huge = TaskAttachmentRepo::create(&pool, &huge).await;
    assert_matches!(huge, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    let orphan = TaskAttachmentRepo::create(&pool, &attachment(None, "image/png", 100)).await;
    assert_matches!(orphan, Err(StoreError::Core(CoreError::InvalidOperation(_))));

    assert_eq!(attachment_count(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn attachment_caption_and_stats(pool: PgPool) {
    let task_id = seed_project_task(&pool).await;
    let png = TaskAttachmentRepo::create(&pool, &attachment(Some(task_id), "image/png", 1024))
        .await
        .unwrap();
    TaskAttachmentRepo::create(&pool, &attachment(Some(task_id), "application/pdf", 512))
        .await
        .unwrap();
    assert!(png.is_image());
    assert_eq!(png.formatted_size(), "1.0 KB");

    let captioned = TaskAttachmentRepo::update_caption(
        &pool,
        png.id,
        &UpdateTaskAttachment { caption: Some("Screenshot".to_string()) },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(captioned.caption.as_deref(), Some("Screenshot"));

    let stats = TaskAttachmentRepo::stats_for_project_task(&pool, task_id).await.unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.total_bytes, 1536);
    assert_eq!(stats.formatted_total, "1.5 KB");

    let by_uploader = TaskAttachmentRepo::stats_for_uploader(&pool, 3).await.unwrap();
    assert_eq!(by_uploader.count, 2);

    TaskAttachmentRepo::soft_delete(&pool, png.id).await.unwrap();
    let stats = TaskAttachmentRepo::stats_for_project_task(&pool, task_id).await.unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.total_bytes, 512);

    let none = TaskAttachmentRepo::stats_for_daily_task(&pool, 999_999).await.unwrap();
    assert_eq!(none.count, 0);
    assert_eq!(none.formatted_total, "0 B");
}

#[sqlx::test(migrations = "./migrations")]
async fn cleanup_removes_attachments_of_deleted_tasks(pool: PgPool) {
    let kept_task = seed_project_task(&pool).await;
    let doomed_task = seed_project_task(&pool).await;
    let kept = TaskAttachmentRepo::create(&pool, &attachment(Some(kept_task), "text/plain", 10))
        .await
        .unwrap();
    let doomed = TaskAttachmentRepo::create(&pool, &attachment(Some(doomed_task), "text/plain", 10))
        .await
        .unwrap();

    ProjectTaskRepo::soft_delete(&pool, doomed_task).await.unwrap();
    assert_eq!(TaskAttachmentRepo::cleanup_orphaned(&pool).await.unwrap(), 1);
    assert_eq!(TaskAttachmentRepo::cleanup_orphaned(&pool).await.unwrap(), 0);

    assert!(TaskAttachmentRepo::find_by_id(&pool, kept.id).await.unwrap().is_some());
    assert!(TaskAttachmentRepo::find_by_id(&pool, doomed.id).await.unwrap().is_none());
    let listed = TaskAttachmentRepo::list_for_task(&pool, TaskRef::Project(kept_task))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}
