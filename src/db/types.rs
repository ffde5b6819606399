//! Type wrappers for tag store keys
//!
//! # Types
//!
//! - **`EntityId`**: a playlist identifier with its URI scheme stripped, the
//!   join key between the tag store, the caches and the provider
//!
//! # Examples
//!
//! ```
//! use playlist_tags::db::EntityId;
//!
//! let id = EntityId::parse("spotify:playlist:37i9dQZF1DX0XUsuxWHRQd").unwrap();
//! assert_eq!(id.as_str(), "37i9dQZF1DX0XUsuxWHRQd");
//! assert_eq!(id.to_uri(), "spotify:playlist:37i9dQZF1DX0XUsuxWHRQd");
//! ```

use super::error::DbError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URI prefix of playlist entities
pub const PLAYLIST_URI_PREFIX: &str = "spotify:playlist:";

/// Opaque identifier of a taggable entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parse user input into an id, stripping the playlist URI prefix
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if nothing is left after trimming or
    /// the id contains whitespace.
    pub fn parse(input: &str) -> Result<Self, DbError> {
        let trimmed = input.trim();
        let id = trimmed.strip_prefix(PLAYLIST_URI_PREFIX).unwrap_or(trimmed);

        if id.is_empty() {
            return Err(DbError::InvalidInput(format!("'{input}' is not a playlist id")));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DbError::InvalidInput(format!(
                "Playlist id '{id}' must not contain whitespace"
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// Id from a URI as returned by the provider, without validation
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        Self(uri.strip_prefix(PLAYLIST_URI_PREFIX).unwrap_or(uri).to_string())
    }

    /// The full playlist URI for this id
    #[must_use]
    pub fn to_uri(&self) -> String {
        format!("{PLAYLIST_URI_PREFIX}{}", self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for EntityId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
