//! Read-through caches in front of the playlist provider
//!
//! Two independent namespaces, each with its own enable flag:
//!
//! - `tags:cache:metadata:<id>`: [`TrimmedMetadata`]
//! - `tags:cache:contents:<id>`: [`TrimmedContents`]
//!
//! Entries never expire; they are only removed by [`CacheLayer::clear`]. A
//! miss only means "ask the provider". A hit returns the trimmed projection
//! rebuilt under the full playlist URI, while a miss returns the full
//! fetched object whether or not storing its trimmed copy succeeded.
//! Unparseable entries are treated as misses and overwritten.

pub mod error;
pub mod trim;

pub use error::CacheError;
pub use trim::{TrimmedContents, TrimmedMetadata};

use crate::db::EntityId;
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::provider::{PlaylistContents, PlaylistMetadata, SharedProvider};
use crate::storage::keys::{CONTENTS_CACHE_PREFIX, METADATA_CACHE_PREFIX};
use crate::storage::{SharedStorage, StorageBackend, StorageError};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Enable flags of the two namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub metadata: bool,
    pub contents: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            metadata: true,
            contents: true,
        }
    }
}

impl CacheSettings {
    /// Both namespaces off
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            metadata: false,
            contents: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self, namespace: CacheNamespace) -> bool {
        match namespace {
            CacheNamespace::Metadata => self.metadata,
            CacheNamespace::Contents => self.contents,
        }
    }
}

/// One of the two cache namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    Metadata,
    Contents,
}

impl CacheNamespace {
    /// Key prefix of every entry in this namespace
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Metadata => METADATA_CACHE_PREFIX,
            Self::Contents => CONTENTS_CACHE_PREFIX,
        }
    }

    #[must_use]
    pub fn key(self, id: &EntityId) -> String {
        format!("{}{id}", self.prefix())
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata => f.write_str("metadata"),
            Self::Contents => f.write_str("contents"),
        }
    }
}

/// Read-through metadata and contents caches
#[derive(Clone)]
pub struct CacheLayer {
    storage: SharedStorage,
    provider: SharedProvider,
    settings: CacheSettings,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLayer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CacheLayer {
    #[must_use]
    pub fn new(storage: SharedStorage, provider: SharedProvider, settings: CacheSettings) -> Self {
        Self {
            storage,
            provider,
            settings,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Replace the notification sink used for quota failures
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub const fn settings(&self) -> CacheSettings {
        self.settings
    }

    #[must_use]
    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Display metadata of `id`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Provider` if the entry is not cached and the
    /// provider fetch fails.
    pub async fn metadata(&self, id: &EntityId) -> Result<PlaylistMetadata, CacheError> {
        let namespace = CacheNamespace::Metadata;
        if let Some(entry) = self.lookup::<TrimmedMetadata>(namespace, id) {
            return Ok(entry.restore(id));
        }

        let metadata = self.provider.metadata(id).await?;
        if self.settings.metadata {
            self.store(namespace, id, &TrimmedMetadata::from_full(&metadata));
        }
        Ok(metadata)
    }

    /// Track list of `id`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Provider` if the entry is not cached and the
    /// provider fetch fails.
    pub async fn contents(&self, id: &EntityId) -> Result<PlaylistContents, CacheError> {
        let namespace = CacheNamespace::Contents;
        if let Some(entry) = self.lookup::<TrimmedContents>(namespace, id) {
            return Ok(entry.restore());
        }

        let contents = self.provider.contents(id).await?;
        if self.settings.contents {
            self.store(namespace, id, &TrimmedContents::from_full(&contents));
        }
        Ok(contents)
    }

    /// Metadata of many playlists, fetched concurrently, in input order
    pub async fn metadata_many(&self, ids: &[EntityId]) -> Vec<Result<PlaylistMetadata, CacheError>> {
        join_all(ids.iter().map(|id| self.metadata(id))).await
    }

    /// Every track URI of `ids`, playlist by playlist
    ///
    /// Playlists are read one after another.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` on the first playlist whose contents cannot be read.
    pub async fn track_uris(&self, ids: &[EntityId]) -> Result<Vec<String>, CacheError> {
        let mut uris = Vec::new();
        for id in ids {
            let contents = self.contents(id).await?;
            uris.extend(contents.items.into_iter().map(|track| track.uri));
        }
        Ok(uris)
    }

    /// Delete every entry of `namespace`, returning how many were removed
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Storage` if keys cannot be listed or removed.
    pub fn clear(&self, namespace: CacheNamespace) -> Result<usize, CacheError> {
        Self::clear_in(self.storage.as_ref(), namespace)
    }

    /// Delete every entry of `namespace` straight from `storage`
    ///
    /// Needs no provider, so the cache can be cleared without a library.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Storage` if keys cannot be listed or removed.
    pub fn clear_in(storage: &dyn StorageBackend, namespace: CacheNamespace) -> Result<usize, CacheError> {
        let keys = storage.keys_with_prefix(namespace.prefix())?;
        for key in &keys {
            storage.remove(key)?;
        }
        tracing::info!(%namespace, count = keys.len(), "cleared cache");
        Ok(keys.len())
    }

    fn lookup<T: DeserializeOwned>(&self, namespace: CacheNamespace, id: &EntityId) -> Option<T> {
        if !self.settings.is_enabled(namespace) {
            return None;
        }

        let key = namespace.key(id);
        let value = match self.storage.get(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(%key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&value) {
            Ok(entry) => {
                debug!(%key, "cache hit");
                Some(entry)
            }
            Err(e) => {
                warn!(%key, error = %e, "corrupted cache entry, refetching");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, namespace: CacheNamespace, id: &EntityId, entry: &T) {
        let key = namespace.key(id);
        let result = serde_json::to_string(entry)
            .map_err(|e| e.to_string())
            .and_then(|value| self.storage.set(&key, &value).map_err(|e| self.on_write_error(e)));

        if let Err(message) = result {
            warn!(%key, error = %message, "cache write failed");
        }
    }

    fn on_write_error(&self, err: StorageError) -> String {
        if err.is_quota_exceeded() {
            self.notifier.notify(Notification::quota_exceeded());
        }
        err.to_string()
    }
}
