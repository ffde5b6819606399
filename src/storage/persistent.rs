//! Persistent storage backend on sled
//!
//! All keys live in a single sled tree. Quota accounting is kept in memory,
//! seeded from the tree on open, so every write can be checked without a
//! scan.

use super::{StorageBackend, StorageError, entry_size};
use sled::{Db, Tree};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

const TREE_NAME: &str = "local_storage";

/// A [`StorageBackend`] persisted with sled
pub struct SledStorage {
    db: Db,
    entries: Tree,
    quota: Option<u64>,
    usage: Mutex<u64>,
}

impl SledStorage {
    /// Opens or creates a store at the specified path
    ///
    /// # Arguments
    /// * `path` - Path to the database directory
    /// * `quota` - Maximum bytes of keys plus values, `None` for unbounded
    ///
    /// # Examples
    /// ```no_run
    /// use playlist_tags::storage::SledStorage;
    /// let store = SledStorage::open("my_db", Some(5 * 1024 * 1024)).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the database cannot be opened or scanned.
    pub fn open<P: AsRef<Path>>(path: P, quota: Option<u64>) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        let entries = db.open_tree(TREE_NAME)?;

        let mut usage = 0;
        for result in &entries {
            let (key, value) = result?;
            usage += (key.len() + value.len()) as u64;
        }

        Ok(Self {
            db,
            entries,
            quota,
            usage: Mutex::new(usage),
        })
    }

    /// Bytes currently counted against the quota
    #[must_use]
    pub fn usage(&self) -> u64 {
        *self.usage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn decode(key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        String::from_utf8(bytes.to_vec()).map_err(|_| StorageError::InvalidUtf8(key.to_string()))
    }
}

impl StorageBackend for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.entries
            .get(key.as_bytes())?
            .map(|value| Self::decode(key, &value))
            .transpose()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut usage = self.usage.lock().unwrap_or_else(PoisonError::into_inner);
        let released = self
            .entries
            .get(key.as_bytes())?
            .map_or(0, |old| (key.len() + old.len()) as u64);
        let required = entry_size(key, value);

        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(usage.saturating_sub(released));
            if required > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    available,
                });
            }
        }

        self.entries.insert(key.as_bytes(), value.as_bytes())?;
        *usage = usage.saturating_sub(released) + required;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut usage = self.usage.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = self.entries.remove(key.as_bytes())? {
            *usage = usage.saturating_sub((key.len() + old.len()) as u64);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for result in self.entries.iter().keys() {
            let key = result?;
            keys.push(Self::decode("<key>", &key)?);
        }
        Ok(keys)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for result in self.entries.scan_prefix(prefix.as_bytes()).keys() {
            let key = result?;
            keys.push(Self::decode(prefix, &key)?);
        }
        Ok(keys)
    }
}

impl Drop for SledStorage {
    fn drop(&mut self) {
        // Best-effort flush on drop; callers needing durability call flush()
        let _ = self.db.flush();
    }
}
