//! Navigation guard.

use super::model::Route;

/// Outcome of the guard for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

/// Runs before every navigation.
///
/// Protected routes send anonymous users to the login page; guest-only
/// routes send signed-in users home.
pub fn guard(to: &Route, has_user: bool) -> Navigation {
    let meta = to.meta();
    if meta.requires_auth && !has_user {
        Navigation::Redirect(Route::Login)
    } else if meta.requires_guest && has_user {
        Navigation::Redirect(Route::Home)
    } else {
        Navigation::Allow
    }
}
