//! Application layer for Taskdeck.
//!
//! Stateful stores the presentation layer reads from: the task collection,
//! the persisted list view settings, and the guarded navigator.

pub mod navigator;
pub mod sorted_todos;
pub mod todo_store;

pub use navigator::{Navigator, UserPresence};
pub use sorted_todos::SortedTodos;
pub use todo_store::{TodoState, TodoStore};
