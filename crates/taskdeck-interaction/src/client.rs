//! API client with bearer injection and 401 recovery.

use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use taskdeck_core::error::Result;
use taskdeck_core::session::SessionRepository;

use crate::auth::AuthSession;
use crate::http::{ApiRequest, ApiResponse, HttpContext};

/// Sends API requests on behalf of the signed-in user.
///
/// Before each request the persisted access token is attached as a bearer
/// header. A 401 answer triggers one refresh through [`AuthSession`] and a
/// single replay of the same request. When the session cannot be recovered
/// the original 401 is returned.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpContext,
    auth: Arc<AuthSession>,
    repository: Arc<dyn SessionRepository>,
}

impl ApiClient {
    pub fn new(
        http: HttpContext,
        auth: Arc<AuthSession>,
        repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            http,
            auth,
            repository,
        }
    }

    pub fn auth(&self) -> &Arc<AuthSession> {
        &self.auth
    }

    async fn persisted_token(&self) -> Option<String> {
        match self.repository.access_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read access token: {}", e);
                None
            }
        }
    }

    /// Sends `request`, returning 2xx responses and turning anything else
    /// into an error.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let sent_token = self.persisted_token().await;
        let request = match &sent_token {
            Some(token) => request.with_bearer(token),
            None => request,
        };

        let response = self.http.dispatch(request.clone()).await?;
        if !response.is_unauthorized() {
            return response.error_for_status();
        }

        let original = response.to_error();
        tracing::debug!("{} {} returned 401, refreshing", request.method, request.path);

        if let Err(e) = self.auth.refresh_after(sent_token.as_deref()).await {
            tracing::warn!("Refresh failed: {}", e);
            if let Err(e) = self.auth.logout().await {
                tracing::warn!("Logout after failed refresh also failed: {}", e);
            }
            return Err(original);
        }

        match self.persisted_token().await {
            Some(token) => {
                let replay = request.with_bearer(&token);
                self.http.dispatch(replay).await?.error_for_status()
            }
            None => Err(original),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).with_json(body)?).await?.json()
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::patch(path).with_json(body)?).await?.json()
    }

    /// Deletes `path`. The response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }
}
