//! Storage backend error types

use thiserror::Error;

/// Errors raised by a [`StorageBackend`](super::StorageBackend)
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the store's quota; nothing was written
    #[error("Storage quota exceeded while writing '{key}': {required} bytes needed, {available} available")]
    QuotaExceeded {
        key: String,
        required: u64,
        available: u64,
    },

    /// Represents a sled database error
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),

    /// A stored value could not be read back as text
    #[error("Value stored under '{0}' is not valid UTF-8")]
    InvalidUtf8(String),
}

impl StorageError {
    /// Whether this is the storage-full condition
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
