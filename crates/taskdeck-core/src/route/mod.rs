//! Route table and navigation guard.

mod guard;
mod model;

pub use guard::{Navigation, guard};
pub use model::{Route, RouteMeta, RouteName};
