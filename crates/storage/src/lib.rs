//! String key-value storage for FILM07
//!
//! This crate provides the persistent namespace the auth flow writes into.
//! Values are plain strings; callers own their own serialization.

mod error;
mod file;
mod memory;

pub use error::*;
pub use file::*;
pub use memory::*;

/// Trait for string-keyed storage access
///
/// Every call is synchronous and independent. There is no transaction
/// spanning a `get` and a later `set`, so read-modify-write sequences from
/// two callers can interleave and the last writer wins.
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any prior value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Checks if a value exists
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
