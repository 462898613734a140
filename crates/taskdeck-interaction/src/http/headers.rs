//! Headers attached to every outgoing request.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::request::{AUTHORIZATION, bearer};

/// Process-wide default headers.
///
/// Shared between the auth session, which sets and clears the bearer
/// token, and the API client, which merges these into each request.
#[derive(Debug, Default)]
pub struct DefaultHeaders {
    entries: RwLock<BTreeMap<String, String>>,
}

impl DefaultHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_bearer(&self, token: &str) {
        self.set(AUTHORIZATION, bearer(token));
    }

    pub fn clear_authorization(&self) {
        self.remove(AUTHORIZATION);
    }

    pub fn authorization(&self) -> Option<String> {
        self.get(AUTHORIZATION)
    }
}
