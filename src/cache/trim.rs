//! Space-saving projections stored in the caches

use crate::db::EntityId;
use crate::provider::types::{LOCAL_URI_PREFIX, TRACK_URI_PREFIX};
use crate::provider::{Image, PlaylistContents, PlaylistMetadata, Track};
use serde::{Deserialize, Serialize};

/// Characters of the description kept in a metadata entry
pub const DESCRIPTION_PREFIX_LEN: usize = 36;

/// Cached metadata: id, title, description prefix and the first image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimmedMetadata {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl TrimmedMetadata {
    #[must_use]
    pub fn from_full(metadata: &PlaylistMetadata) -> Self {
        Self {
            uri: EntityId::from_uri(&metadata.uri).into_string(),
            name: metadata.name.clone(),
            description: metadata.description.chars().take(DESCRIPTION_PREFIX_LEN).collect(),
            images: metadata.images.iter().take(1).cloned().collect(),
        }
    }

    /// Rebuild metadata for `id`; owner and playability are not cached
    #[must_use]
    pub fn restore(self, id: &EntityId) -> PlaylistMetadata {
        PlaylistMetadata {
            uri: id.to_uri(),
            name: self.name,
            description: self.description,
            images: self.images,
            owner: None,
            can_play: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimmedTrack {
    pub uri: String,
}

/// Cached contents: bare track references with the URI scheme removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimmedContents {
    #[serde(default)]
    pub items: Vec<TrimmedTrack>,
}

impl TrimmedContents {
    #[must_use]
    pub fn from_full(contents: &PlaylistContents) -> Self {
        Self {
            items: contents
                .items
                .iter()
                .map(|track| TrimmedTrack {
                    uri: strip_track_uri(&track.uri).to_string(),
                })
                .collect(),
        }
    }

    /// Rebuild the track list; only URIs and the local flag survive
    #[must_use]
    pub fn restore(self) -> PlaylistContents {
        PlaylistContents {
            items: self
                .items
                .into_iter()
                .map(|item| Track::from_uri(restore_track_uri(&item.uri)))
                .collect(),
        }
    }
}

/// Drop the track or local-file scheme from a track URI
#[must_use]
pub fn strip_track_uri(uri: &str) -> &str {
    uri.strip_prefix(TRACK_URI_PREFIX)
        .or_else(|| uri.strip_prefix(LOCAL_URI_PREFIX))
        .unwrap_or(uri)
}

/// Put the scheme back on a stripped reference
///
/// Track ids never contain `:`, local-file references always do.
#[must_use]
pub fn restore_track_uri(reference: &str) -> String {
    if reference.starts_with(TRACK_URI_PREFIX) || reference.starts_with(LOCAL_URI_PREFIX) {
        reference.to_string()
    } else if reference.contains(':') {
        format!("{LOCAL_URI_PREFIX}{reference}")
    } else {
        format!("{TRACK_URI_PREFIX}{reference}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{contents, local_track, metadata, track};

    #[test]
    fn test_trim_metadata() {
        let full = metadata("abc", "Mix", "2019 summer evenings on the coast with friends");
        let trimmed = TrimmedMetadata::from_full(&full);

        assert_eq!(trimmed.uri, "abc");
        assert_eq!(trimmed.description, "2019 summer evenings on the coast wi");
        assert_eq!(trimmed.description.chars().count(), DESCRIPTION_PREFIX_LEN);
        assert_eq!(trimmed.images.len(), 1);
        assert_eq!(trimmed.images[0].url, full.images[0].url);
    }

    #[test]
    fn test_trim_metadata_without_images() {
        let mut full = metadata("abc", "Mix", "short");
        full.images.clear();
        let trimmed = TrimmedMetadata::from_full(&full);
        assert!(trimmed.images.is_empty());
        assert_eq!(trimmed.description, "short");
    }

    #[test]
    fn test_restore_metadata_uses_full_uri() {
        let trimmed = TrimmedMetadata::from_full(&metadata("abc", "Mix", "d"));
        let restored = trimmed.restore(&EntityId::from("abc"));
        assert_eq!(restored.uri, "spotify:playlist:abc");
        assert_eq!(restored.name, "Mix");
    }

    #[test]
    fn test_trim_and_restore_contents() {
        let full = contents(vec![track("t1", &["A"]), local_track("Artist:Album:Song:215")]);
        let trimmed = TrimmedContents::from_full(&full);

        assert_eq!(trimmed.items[0].uri, "t1");
        assert_eq!(trimmed.items[1].uri, "Artist:Album:Song:215");

        let restored = trimmed.restore();
        assert_eq!(restored.items[0].uri, "spotify:track:t1");
        assert!(!restored.items[0].is_local);
        assert_eq!(restored.items[1].uri, "spotify:local:Artist:Album:Song:215");
        assert!(restored.items[1].is_local);
    }

    #[test]
    fn test_restore_track_uri_keeps_full_uris() {
        assert_eq!(restore_track_uri("spotify:track:x"), "spotify:track:x");
    }
}
