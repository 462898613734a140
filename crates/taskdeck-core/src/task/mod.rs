//! Task domain module.
//!
//! - `model`: the task record as served by the API plus the request bodies
//!   used to create and patch tasks.

mod model;

pub use model::{Category, Task, TaskDraft, TaskId, TaskList, TaskPatch, TaskStatus};
