//! Import/export error types

use crate::db::DbError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Tag store error
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CodecError {
    /// Whether this error is the storage-full condition
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        match self {
            Self::Db(err) => err.is_quota_exceeded(),
            Self::Storage(err) => err.is_quota_exceeded(),
        }
    }
}
