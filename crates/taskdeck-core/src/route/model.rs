//! Route table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, TaskdeckError};
use crate::task::TaskId;

/// Access requirement attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_guest: bool,
}

/// Stable route names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum RouteName {
    Home,
    NewTodo,
    EditTodo,
    Login,
}

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// `/`
    Home,
    /// `/new`
    NewTodo,
    /// `/edit/:id`
    EditTodo { id: TaskId },
    /// `/login`
    Login,
}

impl Route {
    /// Resolves a path against the route table.
    ///
    /// Query strings and a trailing slash are ignored.
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["new"] => Ok(Route::NewTodo),
            ["edit", id] => Ok(Route::EditTodo {
                id: TaskId::new(*id),
            }),
            ["login"] => Ok(Route::Login),
            _ => Err(TaskdeckError::not_found("route", path)),
        }
    }

    pub fn name(&self) -> RouteName {
        match self {
            Route::Home => RouteName::Home,
            Route::NewTodo => RouteName::NewTodo,
            Route::EditTodo { .. } => RouteName::EditTodo,
            Route::Login => RouteName::Login,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::NewTodo => "/new".to_string(),
            Route::EditTodo { id } => format!("/edit/{}", id),
            Route::Login => "/login".to_string(),
        }
    }

    pub fn meta(&self) -> RouteMeta {
        match self {
            Route::Home | Route::NewTodo | Route::EditTodo { .. } => RouteMeta {
                requires_auth: true,
                requires_guest: false,
            },
            Route::Login => RouteMeta {
                requires_auth: false,
                requires_guest: true,
            },
        }
    }
}
