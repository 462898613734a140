//! Atomic TOML file operations.
//!
//! Writes go to a uniquely named sibling temp file that is synced and
//! renamed over the target, so readers see either the old or the new
//! document and concurrent writers never share a temp file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use taskdeck_core::error::{Result, TaskdeckError};
use tempfile::NamedTempFile;

/// A handle to a TOML document on disk.
///
/// - **Atomicity**: updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: `update` holds an exclusive lock for read-modify-write
/// - **Durability**: explicit fsync before rename
#[derive(Debug, Clone)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// A missing or blank file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and replaces the file atomically.
    ///
    /// # Arguments
    ///
    /// * `data` - The document to write
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The new document replaced the old one
    /// - `Err`: Serialization failed, or the temp file could not be written
    ///   or persisted over the target
    pub fn save(&self, data: &T) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => return Err(TaskdeckError::io("Path has no parent directory")),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let mut tmp_file = NamedTempFile::new_in(parent)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.as_file().sync_all()?;

        tmp_file.persist(&self.path).map_err(|e| {
            TaskdeckError::io(format!("Failed to replace {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }

    /// Read-modify-write under an exclusive file lock.
    ///
    /// `default_value` seeds the document when the file does not exist yet.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let output = f(&mut data);
        self.save(&data)?;

        Ok(output)
    }
}

/// Exclusive lock on `<file>.lock`, released when the handle closes.
///
/// The lock file itself is left in place: unlinking it while locked would let
/// a later caller lock a fresh inode while a waiter still holds the old one.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                TaskdeckError::io(format!("Failed to acquire lock on {}: {}", lock_path.display(), e))
            })?;
        }

        Ok(FileLock { file })
    }
}
