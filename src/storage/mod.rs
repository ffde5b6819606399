//! Key-value storage backends
//!
//! Every piece of persistent state (tag sets, the tag index and both caches)
//! lives in a flat string-keyed store with a finite quota. The store is an
//! injected [`StorageBackend`] rather than ambient global state, so the same
//! tag store runs against sled on disk or a plain in-memory map in tests.
//!
//! # Key scheme
//!
//! - `tags:<entityId>`: JSON array of tag strings
//! - `tags:taggedPlaylistURIs`: JSON array of indexed entity ids
//! - `tags:cache:metadata:<entityId>`: trimmed metadata JSON
//! - `tags:cache:contents:<entityId>`: trimmed contents JSON

pub mod error;
pub mod keys;
pub mod memory;
pub mod persistent;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use persistent::SledStorage;

use std::sync::Arc;

/// A string-keyed persistent store with a finite quota
///
/// Individual calls are atomic; sequences of calls are not. Writers that need
/// read-modify-write semantics get last-write-wins.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `StorageError::QuotaExceeded` when the write would push the
    /// store over its quota. Nothing is written in that case.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Every key currently stored, in ascending order
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be iterated.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Keys starting with `prefix`, in ascending order
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be iterated.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}

/// Shared handle to a storage backend
pub type SharedStorage = Arc<dyn StorageBackend>;

/// Size a key/value pair occupies against the quota
#[must_use]
pub const fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

/// Default quota, matching the usual browser local-storage allowance
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;
