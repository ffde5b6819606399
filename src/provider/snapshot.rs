//! Provider backed by a JSON library snapshot
//!
//! The snapshot holds the rootlist and, per playlist, the metadata and
//! contents objects exactly as the provider returns them:
//!
//! ```json
//! {
//!   "rootlist": { "items": [ { "type": "playlist", "uri": "spotify:playlist:abc" } ] },
//!   "playlists": {
//!     "abc": { "metadata": { "uri": "spotify:playlist:abc", "name": "Mix" },
//!              "contents": { "items": [] } }
//!   }
//! }
//! ```

use super::{
    Node, PlaylistContents, PlaylistMetadata, PlaylistProvider, ProviderError, RawRootlist,
};
use crate::db::EntityId;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    rootlist: RawRootlist,
    #[serde(default)]
    playlists: HashMap<String, SnapshotPlaylist>,
}

#[derive(Debug, Clone, Deserialize)]
struct SnapshotPlaylist {
    metadata: PlaylistMetadata,
    #[serde(default)]
    contents: PlaylistContents,
}

/// [`PlaylistProvider`] answering from an in-memory library snapshot
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    root: Node,
    playlists: HashMap<EntityId, SnapshotPlaylist>,
}

impl SnapshotProvider {
    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the file cannot be read or is not a snapshot.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a snapshot from JSON text
    ///
    /// Playlist keys may be bare ids or full playlist URIs.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Json` if the text is not a snapshot.
    pub fn from_json(text: &str) -> Result<Self, ProviderError> {
        let snapshot: Snapshot = serde_json::from_str(text)?;
        let playlists = snapshot
            .playlists
            .into_iter()
            .map(|(key, playlist)| (EntityId::from_uri(&key), playlist))
            .collect();
        Ok(Self {
            root: snapshot.rootlist.into_root(),
            playlists,
        })
    }

    /// Number of playlists with data in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    fn playlist(&self, id: &EntityId) -> Result<&SnapshotPlaylist, ProviderError> {
        self.playlists
            .get(id)
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl PlaylistProvider for SnapshotProvider {
    async fn metadata(&self, id: &EntityId) -> Result<PlaylistMetadata, ProviderError> {
        Ok(self.playlist(id)?.metadata.clone())
    }

    async fn contents(&self, id: &EntityId) -> Result<PlaylistContents, ProviderError> {
        Ok(self.playlist(id)?.contents.clone())
    }

    async fn rootlist(&self) -> Result<Node, ProviderError> {
        Ok(self.root.clone())
    }
}
