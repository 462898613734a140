//! Infrastructure layer for Taskdeck.
//!
//! File-backed and in-memory key-value storage, the typed repository over the
//! persisted key space, path resolution and client configuration.

pub mod config_service;
pub mod local_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ClientConfig, ConfigService};
pub use crate::local_repository::LocalRepository;
pub use crate::storage::{KeyValueStore, MemoryKeyValueStore, TomlKeyValueStore};
