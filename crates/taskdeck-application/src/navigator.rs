//! Guarded navigation between routes.

use std::sync::{Arc, PoisonError, RwLock};
use taskdeck_core::error::{Result, TaskdeckError};
use taskdeck_core::route::{Navigation, Route, guard};
use taskdeck_interaction::AuthSession;

/// Redirects followed before navigation gives up.
const MAX_REDIRECTS: usize = 4;

/// Whether a user is currently signed in.
pub trait UserPresence: Send + Sync {
    fn has_user(&self) -> bool;
}

impl UserPresence for AuthSession {
    fn has_user(&self) -> bool {
        self.is_authenticated()
    }
}

pub struct Navigator {
    presence: Arc<dyn UserPresence>,
    current: RwLock<Option<Route>>,
}

impl Navigator {
    pub fn new(presence: Arc<dyn UserPresence>) -> Self {
        Self {
            presence,
            current: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves `path` and navigates to it.
    pub fn navigate(&self, path: &str) -> Result<Route> {
        self.navigate_to(Route::parse(path)?)
    }

    /// Runs the guard for `route` and for every redirect target, and returns
    /// the route finally shown.
    pub fn navigate_to(&self, route: Route) -> Result<Route> {
        let has_user = self.presence.has_user();
        let mut target = route;

        for _ in 0..=MAX_REDIRECTS {
            match guard(&target, has_user) {
                Navigation::Allow => {
                    *self.current.write().unwrap_or_else(PoisonError::into_inner) =
                        Some(target.clone());
                    return Ok(target);
                }
                Navigation::Redirect(next) => {
                    tracing::debug!("Redirecting {} -> {}", target.path(), next.path());
                    target = next;
                }
            }
        }

        Err(TaskdeckError::internal(format!(
            "Too many redirects while navigating to {}",
            target.path()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use taskdeck_core::task::TaskId;

    #[derive(Default)]
    struct Flag(AtomicBool);

    impl UserPresence for Flag {
        fn has_user(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn navigator(signed_in: bool) -> (Arc<Flag>, Navigator) {
        let flag = Arc::new(Flag(AtomicBool::new(signed_in)));
        let navigator = Navigator::new(flag.clone());
        (flag, navigator)
    }

    #[test]
    fn test_anonymous_is_sent_to_login() {
        let (_, nav) = navigator(false);
        assert_eq!(nav.navigate("/").unwrap(), Route::Login);
        assert_eq!(nav.navigate("/new").unwrap(), Route::Login);
        assert_eq!(nav.navigate("/edit/42").unwrap(), Route::Login);
        assert_eq!(nav.current(), Some(Route::Login));
    }

    #[test]
    fn test_signed_in_user_skips_login() {
        let (_, nav) = navigator(true);
        assert_eq!(nav.navigate("/login").unwrap(), Route::Home);
        assert_eq!(
            nav.navigate("/edit/42").unwrap(),
            Route::EditTodo { id: TaskId::new("42") }
        );
    }

    #[test]
    fn test_guard_sees_latest_presence() {
        let (flag, nav) = navigator(false);
        assert_eq!(nav.navigate("/new").unwrap(), Route::Login);

        flag.0.store(true, Ordering::SeqCst);
        assert_eq!(nav.navigate("/new").unwrap(), Route::NewTodo);
    }

    #[test]
    fn test_unknown_path() {
        let (_, nav) = navigator(true);
        let err = nav.navigate("/settings").unwrap_err();
        assert!(err.is_not_found());
        assert!(nav.current().is_none());
    }
}
