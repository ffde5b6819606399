//! Mass-tag error types
//!
//! # Error Types
//!
//! - **`Cancelled`**: the traversal was cancelled before it finished
//! - **`Provider`**: a fetch failed
//! - **`Db`**: reading or writing a playlist's tags failed
//!
//! Only `Cancelled` (and a failed rootlist fetch) ends a run. Per-playlist
//! failures are counted in the summary.

use crate::db::DbError;
use crate::provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MassTagError {
    #[error("Mass tagging was cancelled")]
    Cancelled,

    /// Fetch from the external provider failed
    #[error("Fetch failed: {0}")]
    Provider(#[from] ProviderError),

    /// Tag store error
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}
