//! Domain layer for Taskdeck.
//!
//! Models, repository contracts and the pure parts of the client: the
//! sort/filter view and the navigation guard.

pub mod error;
pub mod route;
pub mod session;
pub mod task;
pub mod view;

// Re-export common error type
pub use error::{Result, TaskdeckError};
