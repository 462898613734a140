//! Typed repository over the persisted key space.
//!
//! All string keys and the JSON encoding of `showCompleted` live here, so
//! the rest of the client only sees typed sessions and view settings.

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use taskdeck_core::error::Result;
use taskdeck_core::session::{Session, SessionRepository};
use taskdeck_core::view::{PreferenceRepository, SortDirection, SortField, ViewSettings};

use crate::storage::KeyValueStore;

/// Persisted key names.
pub mod keys {
    pub const ACCESS: &str = "access";
    pub const REFRESH: &str = "refresh";
    pub const USER: &str = "user";
    pub const SHOW_COMPLETED: &str = "showCompleted";
    pub const SORT_FIELD: &str = "sortField";
    pub const SORT_DIRECTION: &str = "sortDirection";
}

/// Session and preference repository on top of any [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LocalRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn load_session(&self) -> Result<Session> {
        Ok(Session {
            access: self.store.get(keys::ACCESS).await?,
            refresh: self.store.get(keys::REFRESH).await?,
            user: self.store.get(keys::USER).await?,
        })
    }

    async fn access_token(&self) -> Result<Option<String>> {
        self.store.get(keys::ACCESS).await
    }

    async fn save_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.store.set(keys::ACCESS, access).await?;
        self.store.set(keys::REFRESH, refresh).await
    }

    async fn save_user(&self, username: &str) -> Result<()> {
        self.store.set(keys::USER, username).await
    }

    async fn clear_session(&self) -> Result<()> {
        self.store.remove(keys::ACCESS).await?;
        self.store.remove(keys::REFRESH).await?;
        self.store.remove(keys::USER).await
    }
}

#[async_trait]
impl PreferenceRepository for LocalRepository {
    async fn load_view_settings(&self) -> Result<ViewSettings> {
        let mut settings = ViewSettings::default();

        if let Some(raw) = self.store.get(keys::SHOW_COMPLETED).await? {
            match serde_json::from_str::<bool>(&raw) {
                Ok(show_completed) => settings.show_completed = show_completed,
                Err(e) => tracing::warn!(
                    "Ignoring unreadable {} value {:?}: {}",
                    keys::SHOW_COMPLETED,
                    raw,
                    e
                ),
            }
        }

        if let Some(raw) = self.store.get(keys::SORT_FIELD).await? {
            settings.sort_field = SortField::parse(&raw);
        }

        if let Some(raw) = self.store.get(keys::SORT_DIRECTION).await? {
            match SortDirection::from_str(&raw) {
                Ok(direction) => settings.sort_direction = direction,
                Err(_) => tracing::warn!(
                    "Ignoring unknown {} value {:?}",
                    keys::SORT_DIRECTION,
                    raw
                ),
            }
        }

        Ok(settings)
    }

    async fn save_show_completed(&self, show_completed: bool) -> Result<()> {
        let encoded = serde_json::to_string(&show_completed)?;
        self.store.set(keys::SHOW_COMPLETED, &encoded).await
    }

    async fn save_sort_field(&self, field: Option<&SortField>) -> Result<()> {
        let name = field.map(SortField::as_str).unwrap_or_default();
        self.store.set(keys::SORT_FIELD, name).await
    }

    async fn save_sort_direction(&self, direction: SortDirection) -> Result<()> {
        self.store
            .set(keys::SORT_DIRECTION, direction.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryKeyValueStore, TomlKeyValueStore};

    fn repository_with(store: MemoryKeyValueStore) -> LocalRepository {
        LocalRepository::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let store = MemoryKeyValueStore::new();
        let repo = repository_with(store.clone());

        repo.save_tokens("a1", "r1").await.unwrap();
        repo.save_user("alice").await.unwrap();

        let session = repo.load_session().await.unwrap();
        assert_eq!(session.access.as_deref(), Some("a1"));
        assert_eq!(session.refresh.as_deref(), Some("r1"));
        assert_eq!(session.user.as_deref(), Some("alice"));
        assert_eq!(repo.access_token().await.unwrap().as_deref(), Some("a1"));

        assert_eq!(store.get(keys::ACCESS).await.unwrap().as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_empty_storage_loads_default_session() {
        let repo = repository_with(MemoryKeyValueStore::new());

        assert_eq!(repo.load_session().await.unwrap(), Session::default());
        assert_eq!(repo.access_token().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_session_and_preference_writes_converge_on_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.toml");
        let repo = LocalRepository::new(Arc::new(TomlKeyValueStore::new(path.clone())));

        let (tokens, user, shown, direction) = tokio::join!(
            repo.save_tokens("a1", "r1"),
            repo.save_user("alice"),
            repo.save_show_completed(false),
            repo.save_sort_direction(SortDirection::Desc),
        );
        tokens.unwrap();
        user.unwrap();
        shown.unwrap();
        direction.unwrap();

        let reopened = LocalRepository::new(Arc::new(TomlKeyValueStore::new(path)));
        let session = reopened.load_session().await.unwrap();
        assert_eq!(session.access.as_deref(), Some("a1"));
        assert_eq!(session.refresh.as_deref(), Some("r1"));
        assert_eq!(session.user.as_deref(), Some("alice"));
        let settings = reopened.load_view_settings().await.unwrap();
        assert!(!settings.show_completed);
        assert_eq!(settings.sort_direction, SortDirection::Desc);
    }

    #[tokio::test]
    async fn test_clear_session_keeps_preferences() {
        let store = MemoryKeyValueStore::with_entries([
            (keys::ACCESS, "a1"),
            (keys::REFRESH, "r1"),
            (keys::USER, "alice"),
            (keys::SORT_FIELD, "title"),
        ]);
        let repo = repository_with(store.clone());

        repo.clear_session().await.unwrap();

        assert!(repo.load_session().await.unwrap().is_empty());
        assert_eq!(store.get(keys::ACCESS).await.unwrap(), None);
        assert_eq!(store.get(keys::REFRESH).await.unwrap(), None);
        assert_eq!(store.get(keys::USER).await.unwrap(), None);
        assert_eq!(store.get(keys::SORT_FIELD).await.unwrap().as_deref(), Some("title"));
    }

    #[tokio::test]
    async fn test_missing_preferences_keep_defaults() {
        let repo = repository_with(MemoryKeyValueStore::new());
        let settings = repo.load_view_settings().await.unwrap();
        assert_eq!(settings, ViewSettings::default());
    }

    #[tokio::test]
    async fn test_invalid_show_completed_is_ignored() {
        let repo = repository_with(MemoryKeyValueStore::with_entries([
            (keys::SHOW_COMPLETED, "{not json"),
            (keys::SORT_FIELD, "title"),
        ]));

        let settings = repo.load_view_settings().await.unwrap();
        assert!(settings.show_completed);
        assert_eq!(settings.sort_field, Some(SortField::Title));
    }

    #[tokio::test]
    async fn test_invalid_direction_is_ignored() {
        let repo = repository_with(MemoryKeyValueStore::with_entries([(
            keys::SORT_DIRECTION,
            "sideways",
        )]));

        let settings = repo.load_view_settings().await.unwrap();
        assert_eq!(settings.sort_direction, SortDirection::Asc);
    }

    #[tokio::test]
    async fn test_preferences_are_written_in_wire_format() {
        let store = MemoryKeyValueStore::new();
        let repo = repository_with(store.clone());

        repo.save_show_completed(false).await.unwrap();
        repo.save_sort_field(Some(&SortField::Custom("date".into())))
            .await
            .unwrap();
        repo.save_sort_direction(SortDirection::Desc).await.unwrap();

        assert_eq!(store.get(keys::SHOW_COMPLETED).await.unwrap().as_deref(), Some("false"));
        assert_eq!(store.get(keys::SORT_FIELD).await.unwrap().as_deref(), Some("date"));
        assert_eq!(store.get(keys::SORT_DIRECTION).await.unwrap().as_deref(), Some("desc"));

        let settings = repo.load_view_settings().await.unwrap();
        assert!(!settings.show_completed);
        assert_eq!(settings.sort_field, Some(SortField::Custom("date".into())));
        assert_eq!(settings.sort_direction, SortDirection::Desc);
    }

    #[tokio::test]
    async fn test_cleared_sort_field_is_stored_empty() {
        let store = MemoryKeyValueStore::new();
        let repo = repository_with(store.clone());

        repo.save_sort_field(None).await.unwrap();

        assert_eq!(store.get(keys::SORT_FIELD).await.unwrap().as_deref(), Some(""));
        assert!(repo.load_view_settings().await.unwrap().sort_field.is_none());
    }
}
