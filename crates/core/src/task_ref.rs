//! Parent reference for comments and attachments.
//!
//! A comment or attachment hangs off exactly one task: either a project
//! task or a daily task, never both and never neither.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// The task a comment or attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TaskRef {
    Project(DbId),
    Daily(DbId),
}

impl TaskRef {
    /// Resolve the pair of optional ids carried by create payloads.
    pub fn from_ids(
        project_task_id: Option<DbId>,
        daily_task_id: Option<DbId>,
    ) -> Result<Self, CoreError> {
        match (project_task_id, daily_task_id) {
            (Some(id), None) => Ok(Self::Project(id)),
            (None, Some(id)) => Ok(Self::Daily(id)),
            (Some(_), Some(_)) => Err(CoreError::invalid(
                "Exactly one of project_task_id or daily_task_id must be set, not both",
            )),
            (None, None) => Err(CoreError::invalid(
                "Exactly one of project_task_id or daily_task_id must be set",
            )),
        }
    }

    pub fn project_task_id(&self) -> Option<DbId> {
        match self {
            Self::Project(id) => Some(*id),
            Self::Daily(_) => None,
        }
    }

    pub fn daily_task_id(&self) -> Option<DbId> {
        match self {
            Self::Daily(id) => Some(*id),
            Self::Project(_) => None,
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            Self::Project(id) | Self::Daily(id) => *id,
        }
    }

    /// Entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Project(_) => "ProjectTask",
            Self::Daily(_) => "DailyTask",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_only() {
        let r = TaskRef::from_ids(Some(4), None).unwrap();
        assert_eq!(r, TaskRef::Project(4));
        assert_eq!(r.project_task_id(), Some(4));
        assert_eq!(r.daily_task_id(), None);
    }

    #[test]
    fn daily_only() {
        let r = TaskRef::from_ids(None, Some(9)).unwrap();
        assert_eq!(r, TaskRef::Daily(9));
        assert_eq!(r.id(), 9);
        assert_eq!(r.entity(), "DailyTask");
    }

    #[test]
    fn both_set_is_rejected() {
        assert!(matches!(
            TaskRef::from_ids(Some(1), Some(2)),
            Err(CoreError::InvalidOperation(_))
        ));
    }

    #[test]
    fn neither_set_is_rejected() {
        assert!(matches!(
            TaskRef::from_ids(None, None),
            Err(CoreError::InvalidOperation(_))
        ));
    }
}
