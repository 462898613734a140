//! Storage layer: atomic TOML documents and the key-value stores built on them.

mod atomic_toml;
mod key_value;

pub use atomic_toml::AtomicTomlFile;
pub use key_value::{KeyValueStore, MemoryKeyValueStore, TomlKeyValueStore};
