pub mod attachment;
pub mod column;
pub mod comment;
pub mod daily_task;
pub mod project;
pub mod task;
