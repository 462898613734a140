//! Session domain model.

use serde::{Deserialize, Serialize};

/// The authenticated session held by the client.
///
/// `user` decides whether navigation treats the client as signed in; the
/// tokens are only attached to requests and never validated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub user: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns true when none of the three fields is set.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none() && self.user.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Body of `POST /auth/register/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCredentials {
    pub username: String,
    pub telegram_id: i64,
}

/// Response of `POST /auth/register/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub username: String,
}

/// Body of `POST /auth/token/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Response of `POST /auth/token/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of `POST /auth/token/refresh/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response of `POST /auth/token/refresh/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}
