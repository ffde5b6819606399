//! In-memory storage backend

use super::{StorageBackend, StorageError, entry_size};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// A [`StorageBackend`] kept in process memory
///
/// Honors an optional quota the same way the persistent backend does, which
/// makes it the backend of choice for exercising storage-full paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryStorage {
    /// Create an empty store without a quota
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `quota` bytes
    #[must_use]
    pub fn with_quota(quota: u64) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Bytes currently counted against the quota
    #[must_use]
    pub fn usage(&self) -> u64 {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let used: u64 = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
            let released = entries.get(key).map_or(0, |old| entry_size(key, old));
            let required = entry_size(key, value);
            let available = quota.saturating_sub(used - released);
            if required > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    available,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }
}
