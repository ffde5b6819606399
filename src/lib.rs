//! Playlist tags - free-form labels for playlists
//!
//! This library attaches tags to playlists, answers boolean tag queries,
//! derives tags in bulk from playlist data, and keeps read-through caches of
//! that data. Everything is persisted in a quota-limited key-value store.

use thiserror::Error;

pub mod cache;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod db;
pub mod debounce;
pub mod masstag;
pub mod notify;
pub mod output;
pub mod provider;
pub mod sort;
pub mod stats;
pub mod storage;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PlaylistTagsError {
    /// Tag store error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Storage backend error
    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),
    /// Playlist provider error
    #[error("Provider error: {0}")]
    ProviderError(#[from] provider::ProviderError),
    /// Cache layer error
    #[error("Cache error: {0}")]
    CacheError(#[from] cache::CacheError),
    /// Mass tagging error
    #[error("Mass tag error: {0}")]
    MassTagError(#[from] masstag::MassTagError),
    /// Import/export error
    #[error("Import/export error: {0}")]
    CodecError(#[from] codec::CodecError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Clipboard could not be read or written
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
