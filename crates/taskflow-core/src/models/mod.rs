//! Data models for taskflow

mod input;
mod task;

pub use input::{
    NewTask, TaskPatch, CATEGORY_MAX_CHARS, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS,
};
pub use task::{sort_newest_first, Priority, Task, TaskId, UserId, TEMPORARY_ID_PREFIX};
