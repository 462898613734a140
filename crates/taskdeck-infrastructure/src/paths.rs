//! Unified path management for Taskdeck files.
//!
//! ```text
//! ~/.config/taskdeck/          # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/taskdeck/     # Data directory
//! └── storage.toml             # Session tokens and view preferences
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Neither the platform directory nor the home directory could be found.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for taskdeck_core::TaskdeckError {
    fn from(err: PathError) -> Self {
        taskdeck_core::TaskdeckError::config(err.to_string())
    }
}

const APP_DIR: &str = "taskdeck";

pub struct TaskdeckPaths;

impl TaskdeckPaths {
    /// Platform config directory (e.g. `~/.config/taskdeck/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Platform data directory (e.g. `~/.local/share/taskdeck/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join(STORAGE_FILE))
    }
}

/// File name of the key-value store inside a data directory.
pub const STORAGE_FILE: &str = "storage.toml";
