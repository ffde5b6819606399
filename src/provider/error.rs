//! Provider error types

use thiserror::Error;

/// Errors raised while fetching from the external provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not know the requested playlist
    #[error("Playlist not found: {0}")]
    NotFound(String),

    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The provider returned data that is not the expected JSON
    #[error("Invalid provider data: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider could not be reached or refused the request
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
