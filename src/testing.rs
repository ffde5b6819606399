//! Testing utilities for playlist-tags
//!
//! Helper types for unit tests: a [`TestStore`] over in-memory storage, a
//! scripted [`FakeProvider`], [`FailingWrites`] for forcing quota errors
//! on selected keys, and a [`RecordingNotifier`] that keeps what it is told.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::{EntityId, TagStore};
use crate::notify::{Notification, Notifier, Severity};
use crate::provider::{
    Artist, Image, Node, PlaylistContents, PlaylistMetadata, PlaylistProvider, ProviderError, Track,
    User,
};
use crate::storage::{MemoryStorage, SharedStorage, StorageBackend, StorageError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A tag store over fresh in-memory storage with a recording notifier
pub struct TestStore {
    storage: Arc<MemoryStorage>,
    notifier: Arc<RecordingNotifier>,
    store: TagStore,
}

impl TestStore {
    /// Unlimited in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::from_storage(Arc::new(MemoryStorage::new()))
    }

    /// In-memory store holding at most `quota` bytes
    #[must_use]
    pub fn with_quota(quota: u64) -> Self {
        Self::from_storage(Arc::new(MemoryStorage::with_quota(quota)))
    }

    fn from_storage(storage: Arc<MemoryStorage>) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = TagStore::new(storage.clone()).with_notifier(notifier.clone());
        Self {
            storage,
            notifier,
            store,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &TagStore {
        &self.store
    }

    #[must_use]
    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    /// The storage as the shared handle other components take
    #[must_use]
    pub fn shared_storage(&self) -> SharedStorage {
        self.storage.clone()
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<RecordingNotifier> {
        &self.notifier
    }
}

/// Keeps every notification it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of error notifications received
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.severity == Severity::Error)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Storage wrapper rejecting writes to keys with a given prefix
pub struct FailingWrites {
    inner: MemoryStorage,
    prefix: String,
}

impl FailingWrites {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            inner: MemoryStorage::new(),
            prefix: prefix.to_string(),
        }
    }
}

impl StorageBackend for FailingWrites {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.starts_with(&self.prefix) {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                required: crate::storage::entry_size(key, value),
                available: 0,
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }
}

/// Scripted in-memory provider counting every fetch
#[derive(Default)]
pub struct FakeProvider {
    metadata: HashMap<EntityId, PlaylistMetadata>,
    contents: HashMap<EntityId, PlaylistContents>,
    root: Option<Node>,
    failing: HashSet<EntityId>,
    hanging: HashSet<EntityId>,
    metadata_calls: AtomicUsize,
    contents_calls: AtomicUsize,
}

impl FakeProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: PlaylistMetadata) -> Self {
        self.metadata.insert(EntityId::from_uri(&metadata.uri), metadata);
        self
    }

    #[must_use]
    pub fn with_contents(mut self, id: &str, contents: PlaylistContents) -> Self {
        self.contents.insert(EntityId::from(id), contents);
        self
    }

    #[must_use]
    pub fn with_root(mut self, root: Node) -> Self {
        self.root = Some(root);
        self
    }

    /// Every fetch for `id` fails
    #[must_use]
    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(EntityId::from(id));
        self
    }

    /// Every fetch for `id` never completes
    #[must_use]
    pub fn hanging(mut self, id: &str) -> Self {
        self.hanging.insert(EntityId::from(id));
        self
    }

    #[must_use]
    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn contents_calls(&self) -> usize {
        self.contents_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self, id: &EntityId) -> Result<(), ProviderError> {
        if self.hanging.contains(id) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(id) {
            return Err(ProviderError::Unavailable(format!("scripted failure for {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaylistProvider for FakeProvider {
    async fn metadata(&self, id: &EntityId) -> Result<PlaylistMetadata, ProviderError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.gate(id).await?;
        self.metadata
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn contents(&self, id: &EntityId) -> Result<PlaylistContents, ProviderError> {
        self.contents_calls.fetch_add(1, Ordering::SeqCst);
        self.gate(id).await?;
        self.contents
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn rootlist(&self) -> Result<Node, ProviderError> {
        Ok(self.root.clone().unwrap_or_else(|| Node::folder("", Vec::new())))
    }
}

/// Metadata for playlist `id` with a title, description and owner
#[must_use]
pub fn metadata(id: &str, name: &str, description: &str) -> PlaylistMetadata {
    PlaylistMetadata {
        uri: EntityId::from(id).to_uri(),
        name: name.to_string(),
        description: description.to_string(),
        images: vec![
            Image {
                url: format!("https://img.example/{id}/large"),
                label: "large".to_string(),
            },
            Image {
                url: format!("https://img.example/{id}/small"),
                label: "small".to_string(),
            },
        ],
        owner: Some(User {
            uri: "spotify:user:owner".to_string(),
            username: "owner".to_string(),
            display_name: "Playlist Owner".to_string(),
        }),
        can_play: true,
    }
}

/// A streamable track by `artists`
#[must_use]
pub fn track(id: &str, artists: &[&str]) -> Track {
    Track {
        artists: artists
            .iter()
            .map(|name| Artist {
                uri: String::new(),
                name: (*name).to_string(),
            })
            .collect(),
        ..Track::from_uri(format!("spotify:track:{id}"))
    }
}

/// A local-file track
#[must_use]
pub fn local_track(path: &str) -> Track {
    Track::from_uri(format!("spotify:local:{path}"))
}

/// Contents made of `tracks`
#[must_use]
pub fn contents(tracks: Vec<Track>) -> PlaylistContents {
    PlaylistContents { items: tracks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::info("first"));
        notifier.notify(Notification::quota_exceeded());

        let received = notifier.notifications();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].message, "first");
        assert_eq!(received[1].severity, Severity::Error);
        assert_eq!(notifier.error_count(), 1);
    }
}
