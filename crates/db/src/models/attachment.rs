//! Task attachment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use workdesk_core::attachments::{format_file_size, is_document, is_image};
use workdesk_core::types::{DbId, Timestamp};

/// A row from the `task_attachments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskAttachment {
    pub id: DbId,
    pub project_task_id: Option<DbId>,
    pub daily_task_id: Option<DbId>,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub caption: Option<String>,
    pub uploaded_by: DbId,
    pub uploaded_by_name: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TaskAttachment {
    pub fn is_image(&self) -> bool {
        is_image(&self.mime_type)
    }

    pub fn is_document(&self) -> bool {
        is_document(&self.mime_type)
    }

    pub fn formatted_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// DTO for registering an uploaded file. Exactly one task id must be set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskAttachment {
    pub project_task_id: Option<DbId>,
    pub daily_task_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1))]
    pub file_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub caption: Option<String>,
    pub uploaded_by: DbId,
    #[validate(length(min = 1, max = 200))]
    pub uploaded_by_name: String,
}

/// DTO for editing an attachment. Only the caption may change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskAttachment {
    pub caption: Option<String>,
}

/// Count and byte total over a set of attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentStats {
    pub count: i64,
    pub total_bytes: i64,
    pub formatted_total: String,
}

impl AttachmentStats {
    pub fn new(count: i64, total_bytes: i64) -> Self {
        Self {
            count,
            total_bytes,
            formatted_total: format_file_size(total_bytes),
        }
    }
}

/// Query for attachment statistics: by task or by uploader.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentStatsQuery {
    pub project_task_id: Option<DbId>,
    pub daily_task_id: Option<DbId>,
    pub uploaded_by: Option<DbId>,
}
