//! Cache layer error types
//!
//! # Error Types
//!
//! - **`Provider`**: the source of truth could not be fetched on a miss
//! - **`Storage`**: cached keys could not be listed or deleted
//!
//! Failed cache writes are never errors; a read always returns what it
//! fetched.

use crate::provider::ProviderError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Fetch from the external provider failed
    #[error("Fetch failed: {0}")]
    Provider(#[from] ProviderError),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
