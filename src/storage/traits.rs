//! Storage abstraction trait.
//!
//! The repository works against this interface so the backing medium can be
//! swapped (files, an embedded database, an in-memory store for tests)
//! without touching the domain layer.

use anyhow::Result;

/// A durable local key-value store. Each operation is independently fallible;
/// callers above the repository never see these errors directly.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
