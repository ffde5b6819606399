//! Data returned by the external playlist provider
//!
//! Field names follow the provider's camelCase JSON. Only the fields the tag
//! layer reads are modelled; everything else is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// URI prefix of streamable tracks
pub const TRACK_URI_PREFIX: &str = "spotify:track:";

/// URI prefix of local-file tracks
pub const LOCAL_URI_PREFIX: &str = "spotify:local:";

/// URI prefix of generated mosaic cover images
pub const MOSAIC_IMAGE_PREFIX: &str = "spotify:mosaic:";

const fn playable() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
}

/// Display metadata of one playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMetadata {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    #[serde(default = "playable")]
    pub can_play: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub uri: String,
    pub name: String,
}

/// One entry of a playlist's track list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default = "playable")]
    pub is_playable: bool,
    #[serde(default)]
    pub is_explicit: bool,
}

impl Track {
    /// A track known only by its URI
    #[must_use]
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            is_local: uri.starts_with(LOCAL_URI_PREFIX),
            uri,
            name: String::new(),
            artists: Vec::new(),
            is_playable: true,
            is_explicit: false,
        }
    }
}

/// Track list of one playlist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistContents {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_from_provider_json() {
        let json = r#"{
            "type": "playlist",
            "uri": "spotify:playlist:abc",
            "name": "Mix",
            "description": "2019 summer",
            "images": [{"url": "https://i.scdn.co/a", "label": "large"}],
            "owner": {"uri": "spotify:user:u", "username": "u", "displayName": "Some One"},
            "canPlay": false,
            "totalLength": 12
        }"#;
        let metadata: PlaylistMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.name, "Mix");
        assert_eq!(metadata.owner.unwrap().display_name, "Some One");
        assert!(!metadata.can_play);
        assert_eq!(metadata.images.len(), 1);
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata: PlaylistMetadata =
            serde_json::from_str(r#"{"uri": "spotify:playlist:abc", "name": "Mix"}"#).unwrap();
        assert!(metadata.can_play);
        assert!(metadata.owner.is_none());
        assert!(metadata.description.is_empty());
    }

    #[test]
    fn test_track_from_uri_detects_local() {
        assert!(Track::from_uri("spotify:local:a:b:c:100").is_local);
        assert!(!Track::from_uri("spotify:track:4uLU6hMCjMI75M1A2tKUQC").is_local);
    }
}
