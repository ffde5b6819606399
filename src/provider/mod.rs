//! External playlist provider
//!
//! Metadata, track lists and the library tree come from outside this crate.
//! [`PlaylistProvider`] is the seam; [`SnapshotProvider`] serves a JSON dump
//! of a library for the command-line tool and for tests.

pub mod error;
pub mod snapshot;
pub mod tree;
pub mod types;

pub use error::ProviderError;
pub use snapshot::SnapshotProvider;
pub use tree::{Folder, Leaf, Node, RawItem, RawRootlist};
pub use types::{Artist, Image, PlaylistContents, PlaylistMetadata, Track, User};

use crate::db::EntityId;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of truth for playlist data
#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    /// Full display metadata of a playlist
    async fn metadata(&self, id: &EntityId) -> Result<PlaylistMetadata, ProviderError>;

    /// Full track list of a playlist
    async fn contents(&self, id: &EntityId) -> Result<PlaylistContents, ProviderError>;

    /// The user's library tree, rooted at an unnamed folder
    async fn rootlist(&self) -> Result<Node, ProviderError>;
}

/// Shared handle to a provider
pub type SharedProvider = Arc<dyn PlaylistProvider>;
