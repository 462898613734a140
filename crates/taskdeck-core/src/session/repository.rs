//! Session repository trait.

use async_trait::async_trait;

use super::model::Session;
use crate::error::Result;

/// Persistence for the session triple (`access`, `refresh`, `user`).
///
/// Every write goes straight to durable storage; callers keep their own
/// in-memory copy in step with it.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads whatever session fields are currently persisted.
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: Fields that were never stored are `None`; an empty
    ///   storage yields [`Session::default`]
    /// - `Err`: The underlying storage could not be read
    async fn load_session(&self) -> Result<Session>;

    /// Reads the persisted access token.
    ///
    /// This is the token request interception attaches, so it is read from
    /// storage on every call rather than from an in-memory copy.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))`: A token is stored
    /// - `Ok(None)`: No user is signed in
    /// - `Err`: The underlying storage could not be read
    async fn access_token(&self) -> Result<Option<String>>;

    /// Persists the access/refresh token pair.
    ///
    /// # Arguments
    ///
    /// * `access` - The short-lived access token
    /// * `refresh` - The refresh token used to mint new access tokens
    async fn save_tokens(&self, access: &str, refresh: &str) -> Result<()>;

    /// Persists the signed-in username.
    ///
    /// # Arguments
    ///
    /// * `username` - The name shown for the current user
    async fn save_user(&self, username: &str) -> Result<()>;

    /// Removes all three session keys.
    async fn clear_session(&self) -> Result<()>;
}
