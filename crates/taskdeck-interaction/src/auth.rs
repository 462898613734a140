//! Authentication session.
//!
//! `AuthSession` owns the token pair and the signed-in user. Every mutation
//! is written through to the [`SessionRepository`] and mirrored into the
//! shared default `Authorization` header.

use serde::{Serialize, de::DeserializeOwned};
use std::sync::{Arc, PoisonError, RwLock};
use taskdeck_core::error::{Result, TaskdeckError};
use taskdeck_core::session::{
    AccessToken, LoginCredentials, RefreshRequest, RegisterCredentials, RegisteredUser, Session,
    SessionRepository, TokenPair,
};
use tokio::sync::Mutex;

use crate::http::{ApiRequest, HttpContext};

pub const REGISTER_PATH: &str = "/auth/register/";
pub const TOKEN_PATH: &str = "/auth/token/";
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

pub struct AuthSession {
    http: HttpContext,
    repository: Arc<dyn SessionRepository>,
    state: RwLock<Session>,
    refresh_lock: Mutex<()>,
}

impl AuthSession {
    /// Creates a session from whatever the repository holds.
    ///
    /// A persisted access token is installed as the default bearer header.
    pub async fn restore(
        http: HttpContext,
        repository: Arc<dyn SessionRepository>,
    ) -> Result<Self> {
        let session = repository.load_session().await?;
        if let Some(access) = &session.access {
            http.headers().set_bearer(access);
        }
        tracing::debug!(
            "Restored session (user: {})",
            session.user.as_deref().unwrap_or("<none>")
        );

        Ok(Self {
            http,
            repository,
            state: RwLock::new(session),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn session(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<String> {
        self.session().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session().access
    }

    fn update_state(&self, f: impl FnOnce(&mut Session)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Posts to an auth endpoint. These requests skip the 401 recovery.
    async fn post_auth<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::post(path).with_json(body)?;
        self.http.dispatch(request).await?.error_for_status()?.json()
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<()> {
        self.register_user(credentials).await.inspect_err(|e| {
            tracing::error!("Registration failed: {}", e);
        })
    }

    async fn register_user(&self, credentials: &RegisterCredentials) -> Result<()> {
        let registered: RegisteredUser = self.post_auth(REGISTER_PATH, credentials).await?;
        self.update_state(|s| s.user = Some(registered.username.clone()));
        self.repository.save_user(&registered.username).await?;
        tracing::info!("Registered user {}", registered.username);
        Ok(())
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<()> {
        self.obtain_tokens(credentials).await.inspect_err(|e| {
            tracing::error!("Login failed: {}", e);
        })
    }

    async fn obtain_tokens(&self, credentials: &LoginCredentials) -> Result<()> {
        let tokens: TokenPair = self.post_auth(TOKEN_PATH, credentials).await?;
        self.set_tokens(&tokens.access, &tokens.refresh).await?;
        self.update_state(|s| s.user = Some(credentials.username.clone()));
        self.repository.save_user(&credentials.username).await?;
        tracing::info!("Logged in as {}", credentials.username);
        Ok(())
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Any failure ends in a full logout instead of an error. The returned
    /// error, if any, comes from clearing the persisted session.
    pub async fn refresh_token(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refreshes unless the access token already moved past `stale`.
    ///
    /// Callers pass the token their failed request carried. When several
    /// requests fail with the same token, the first one refreshes and the
    /// others find a new token once they get the lock.
    pub async fn refresh_after(&self, stale: Option<&str>) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.access_token()
            && Some(current.as_str()) != stale
        {
            tracing::debug!("Access token already refreshed, skipping refresh");
            return Ok(());
        }

        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<()> {
        match self.exchange_refresh_token().await {
            Ok(()) => {
                tracing::debug!("Access token refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, logging out: {}", e);
                self.logout().await
            }
        }
    }

    async fn exchange_refresh_token(&self) -> Result<()> {
        let refresh = self
            .session()
            .refresh
            .ok_or_else(|| TaskdeckError::not_found("token", "refresh"))?;
        let body = RefreshRequest {
            refresh: refresh.clone(),
        };
        let token: AccessToken = self.post_auth(REFRESH_PATH, &body).await?;
        self.set_tokens(&token.access, &refresh).await
    }

    /// Clears the session in memory, in storage and in the default headers.
    pub async fn logout(&self) -> Result<()> {
        let user = self.user();
        self.update_state(Session::clear);
        self.http.headers().clear_authorization();
        self.repository.clear_session().await?;

        if let Some(user) = user {
            tracing::info!("Logged out {}", user);
        }
        Ok(())
    }

    pub async fn set_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.update_state(|s| {
            s.access = Some(access.to_string());
            s.refresh = Some(refresh.to_string());
        });
        self.http.headers().set_bearer(access);
        self.repository.save_tokens(access, refresh).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{AUTHORIZATION, ApiResponse, FakeTransport, Method};
    use serde_json::json;
    use taskdeck_infrastructure::MemoryKeyValueStore;
    use taskdeck_infrastructure::local_repository::{LocalRepository, keys};
    use taskdeck_infrastructure::storage::KeyValueStore;

    struct Fixture {
        fake: FakeTransport,
        store: MemoryKeyValueStore,
        session: AuthSession,
        http: HttpContext,
    }

    async fn fixture(entries: &[(&str, &str)]) -> Fixture {
        let fake = FakeTransport::new();
        let store = MemoryKeyValueStore::with_entries(entries.iter().copied());
        let http = HttpContext::new(Arc::new(fake.clone()), "http://api.test");
        let repository = Arc::new(LocalRepository::new(Arc::new(store.clone())));
        let session = AuthSession::restore(http.clone(), repository).await.unwrap();
        Fixture {
            fake,
            store,
            session,
            http,
        }
    }

    #[tokio::test]
    async fn test_restore_installs_bearer() {
        let f = fixture(&[(keys::ACCESS, "a1"), (keys::USER, "alice")]).await;
        assert!(f.session.is_authenticated());
        assert_eq!(f.http.headers().authorization().as_deref(), Some("Bearer a1"));
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_user() {
        let f = fixture(&[]).await;
        f.fake.enqueue(
            Method::Post,
            TOKEN_PATH,
            200,
            json!({"access": "a1", "refresh": "r1"}),
        );

        f.session
            .login(&LoginCredentials {
                username: "alice".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        let session = f.session.session();
        assert_eq!(session.access.as_deref(), Some("a1"));
        assert_eq!(session.refresh.as_deref(), Some("r1"));
        assert_eq!(session.user.as_deref(), Some("alice"));
        assert_eq!(f.store.get(keys::ACCESS).await.unwrap().as_deref(), Some("a1"));
        assert_eq!(f.store.get(keys::REFRESH).await.unwrap().as_deref(), Some("r1"));
        assert_eq!(f.store.get(keys::USER).await.unwrap().as_deref(), Some("alice"));
        assert_eq!(f.http.headers().authorization().as_deref(), Some("Bearer a1"));

        let sent = &f.fake.requests()[0];
        assert_eq!(sent.body, Some(json!({"username": "alice", "password": "secret"})));
    }

    #[tokio::test]
    async fn test_login_failure_propagates() {
        let f = fixture(&[]).await;
        f.fake.enqueue(
            Method::Post,
            TOKEN_PATH,
            401,
            json!({"detail": "No active account found with the given credentials"}),
        );

        let err = f
            .session
            .login(&LoginCredentials {
                username: "alice".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(f.session.session().is_empty());
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_sets_user_only() {
        let f = fixture(&[]).await;
        f.fake
            .enqueue(Method::Post, REGISTER_PATH, 201, json!({"username": "bob"}));

        f.session
            .register(&RegisterCredentials {
                username: "bob".into(),
                telegram_id: 42,
            })
            .await
            .unwrap();

        assert_eq!(f.session.user().as_deref(), Some("bob"));
        assert!(f.session.access_token().is_none());
        assert_eq!(f.store.get(keys::USER).await.unwrap().as_deref(), Some("bob"));
        assert_eq!(
            f.fake.requests()[0].body,
            Some(json!({"username": "bob", "telegram_id": 42}))
        );
    }

    #[tokio::test]
    async fn test_register_failure_propagates() {
        let f = fixture(&[]).await;
        f.fake.enqueue(
            Method::Post,
            REGISTER_PATH,
            400,
            json!({"username": ["A user with that username already exists."]}),
        );

        let err = f
            .session
            .register(&RegisterCredentials {
                username: "bob".into(),
                telegram_id: 42,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(f.session.user().is_none());
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token() {
        let f = fixture(&[
            (keys::ACCESS, "old"),
            (keys::REFRESH, "r1"),
            (keys::USER, "alice"),
        ])
        .await;
        f.fake
            .enqueue(Method::Post, REFRESH_PATH, 200, json!({"access": "new"}));

        f.session.refresh_token().await.unwrap();

        assert_eq!(f.session.access_token().as_deref(), Some("new"));
        assert_eq!(f.store.get(keys::REFRESH).await.unwrap().as_deref(), Some("r1"));
        assert_eq!(f.http.headers().authorization().as_deref(), Some("Bearer new"));
        assert_eq!(f.fake.requests()[0].body, Some(json!({"refresh": "r1"})));
    }

    #[tokio::test]
    async fn test_failed_refresh_logs_out() {
        let f = fixture(&[
            (keys::ACCESS, "old"),
            (keys::REFRESH, "r1"),
            (keys::USER, "alice"),
            (keys::SORT_DIRECTION, "desc"),
        ])
        .await;
        f.fake.enqueue(
            Method::Post,
            REFRESH_PATH,
            401,
            json!({"detail": "Token is invalid or expired"}),
        );

        f.session.refresh_token().await.unwrap();

        assert!(f.session.session().is_empty());
        assert!(f.http.headers().authorization().is_none());
        assert_eq!(f.store.get(keys::ACCESS).await.unwrap(), None);
        assert_eq!(f.store.get(keys::REFRESH).await.unwrap(), None);
        assert_eq!(f.store.get(keys::USER).await.unwrap(), None);
        assert_eq!(
            f.store.get(keys::SORT_DIRECTION).await.unwrap().as_deref(),
            Some("desc")
        );
    }

    #[tokio::test]
    async fn test_refresh_without_token_logs_out_without_request() {
        let f = fixture(&[(keys::ACCESS, "old"), (keys::USER, "alice")]).await;

        f.session.refresh_token().await.unwrap();

        assert!(f.session.session().is_empty());
        assert!(f.fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_after_skips_when_token_moved_on() {
        let f = fixture(&[(keys::ACCESS, "new"), (keys::REFRESH, "r1")]).await;

        f.session.refresh_after(Some("old")).await.unwrap();

        assert_eq!(f.fake.count(Method::Post, REFRESH_PATH), 0);
        assert_eq!(f.session.access_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_refresh_request_carries_default_header() {
        let f = fixture(&[(keys::ACCESS, "a1"), (keys::REFRESH, "r1")]).await;
        f.fake.respond(Method::Post, REFRESH_PATH, |_| {
            ApiResponse::json_body(200, &json!({"access": "a2"}))
        });

        f.session.refresh_after(Some("a1")).await.unwrap();

        let sent = &f.fake.requests()[0];
        assert_eq!(sent.header(AUTHORIZATION), Some("Bearer a1"));
        assert_eq!(f.session.access_token().as_deref(), Some("a2"));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let f = fixture(&[
            (keys::ACCESS, "a1"),
            (keys::REFRESH, "r1"),
            (keys::USER, "alice"),
        ])
        .await;

        f.session.logout().await.unwrap();

        assert!(!f.session.is_authenticated());
        assert!(f.session.session().is_empty());
        assert!(f.http.headers().authorization().is_none());
        assert!(f.store.is_empty().await);
    }
}
