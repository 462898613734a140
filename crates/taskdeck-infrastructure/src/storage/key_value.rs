//! String key-value stores backing the persisted client state.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskdeck_core::error::{Result, TaskdeckError};
use tokio::sync::{Mutex, RwLock};

use super::atomic_toml::AtomicTomlFile;

/// Durable string key-value storage.
///
/// Mirrors the browser storage contract: values are plain strings, a missing
/// key reads as `None`, and removing a missing key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - The storage key
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: The key is present
    /// - `Ok(None)`: The key was never set or has been removed
    /// - `Err(_)`: The backing storage could not be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Writes to distinct keys made concurrently through the same store must
    /// all be visible once every call has returned.
    ///
    /// # Arguments
    ///
    /// * `key` - The storage key
    /// * `value` - The raw string value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Key-value store persisted as a flat TOML table.
///
/// ```text
/// access = "eyJhbGciOi..."
/// refresh = "eyJhbGciOi..."
/// user = "alice"
/// showCompleted = "false"
/// sortField = "due_date"
/// sortDirection = "desc"
/// ```
///
/// Writes from this process are queued on `write_lock` before taking the
/// cross-process file lock, so blocking threads are not parked on `flock`.
#[derive(Debug, Clone)]
pub struct TomlKeyValueStore {
    file: AtomicTomlFile<BTreeMap<String, String>>,
    write_lock: Arc<Mutex<()>>,
}

impl TomlKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn run_blocking<F, R>(&self, op: F) -> Result<R>
    where
        F: FnOnce(AtomicTomlFile<BTreeMap<String, String>>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(file))
            .await
            .map_err(|e| TaskdeckError::internal(format!("Failed to join storage task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for TomlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            let map = file.load()?.unwrap_or_default();
            Ok(map.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        let _guard = self.write_lock.lock().await;
        self.run_blocking(move |file| {
            file.update(BTreeMap::new(), |map| {
                map.insert(key, value);
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        let _guard = self.write_lock.lock().await;
        self.run_blocking(move |file| {
            file.update(BTreeMap::new(), |map| {
                map.remove(&key);
            })
        })
        .await
    }
}

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
