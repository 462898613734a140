//! Client configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `~/.config/taskdeck/config.toml`
//! 3. environment (`TASKDECK_API_URL`, `TASKDECK_DATA_DIR`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use taskdeck_core::error::Result;

use crate::paths::{STORAGE_FILE, TaskdeckPaths};
use crate::storage::AtomicTomlFile;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "TASKDECK_API_URL";
pub const DATA_DIR_ENV: &str = "TASKDECK_DATA_DIR";

/// Effective client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every API path is joined to, without a trailing slash.
    pub api_base_url: String,
    /// Directory holding `storage.toml`. `None` uses the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Path of the persisted key-value store.
    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.join(STORAGE_FILE)),
            None => Ok(TaskdeckPaths::storage_file()?),
        }
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if trimmed.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }
}

/// On-disk shape of `config.toml`; every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    data_dir: Option<PathBuf>,
}

/// Loads [`ClientConfig`] from file and environment.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<ConfigFile>,
}

impl ConfigService {
    /// Uses the platform config file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(TaskdeckPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Defaults, then the config file, then the process environment.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with a custom override source.
    pub fn load_with<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(file) = self.file.load()? {
            tracing::debug!("Loaded client config from {}", self.file.path().display());
            if let Some(url) = file.api_base_url {
                config.api_base_url = url;
            }
            if file.data_dir.is_some() {
                config.data_dir = file.data_dir;
            }
        }

        Ok(config.apply_overrides(lookup))
    }
}
