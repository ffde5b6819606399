//! Tag store error types
//!
//! # Error Types
//!
//! - **`Storage`**: the backend rejected a read or write (including quota)
//! - **`Corrupt`**: a stored tag set or index is not the JSON it should be
//! - **`EncodeError`**: a tag set could not be serialized
//! - **`InvalidPattern`**: a removal pattern failed to compile
//! - **`InvalidInput`**: malformed ids or other user input

use crate::storage::StorageError;
use thiserror::Error;

/// Tag store errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored value could not be parsed
    #[error("Corrupted value under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Represents a JSON encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] serde_json::Error),

    /// Removal pattern is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Invalid input provided (e.g., an empty playlist id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DbError {
    /// Whether this error is the storage-full condition
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Storage(err) if err.is_quota_exceeded())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
