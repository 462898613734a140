//! Sort/filter view over a task collection.
//!
//! - `model`: the three persisted view settings
//! - `sort`: derivation of the visible list from a task slice
//! - `repository`: persistence contract for the settings

mod model;
pub mod repository;
mod sort;

pub use model::{SortDirection, SortField, ViewSettings};
pub use repository::PreferenceRepository;
pub use sort::{FieldValue, apply_view, compare_tasks, field_value};
