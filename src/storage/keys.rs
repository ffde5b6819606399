//! Storage key scheme
//!
//! All keys share the `tags:` prefix. Cache entries live under `tags:cache:`
//! and the index of tagged entities under a single fixed key; everything
//! else under `tags:` is one entity's tag set.

use crate::db::EntityId;

/// Prefix shared by every key this crate writes
pub const TAG_KEY_PREFIX: &str = "tags:";

/// Key holding the JSON list of tagged entity ids
pub const INDEX_KEY: &str = "tags:taggedPlaylistURIs";

/// Prefix shared by both cache namespaces
pub const CACHE_KEY_PREFIX: &str = "tags:cache:";

/// Prefix of trimmed metadata cache entries
pub const METADATA_CACHE_PREFIX: &str = "tags:cache:metadata:";

/// Prefix of trimmed contents cache entries
pub const CONTENTS_CACHE_PREFIX: &str = "tags:cache:contents:";

/// Key of the tag set for `id`
#[must_use]
pub fn tag_key(id: &EntityId) -> String {
    format!("{TAG_KEY_PREFIX}{id}")
}

/// Whether `key` holds a cache entry
#[must_use]
pub fn is_cache_key(key: &str) -> bool {
    key.starts_with(CACHE_KEY_PREFIX)
}

/// Whether `key` holds one entity's tag set
#[must_use]
pub fn is_entity_tag_key(key: &str) -> bool {
    key.starts_with(TAG_KEY_PREFIX) && !is_cache_key(key) && key != INDEX_KEY
}

/// The entity id a tag-set key belongs to
///
/// Returns `None` for the index key, cache keys, foreign keys and keys with
/// an empty id.
#[must_use]
pub fn entity_id_from_key(key: &str) -> Option<EntityId> {
    if !is_entity_tag_key(key) {
        return None;
    }
    key.strip_prefix(TAG_KEY_PREFIX)
        .filter(|id| !id.is_empty())
        .map(EntityId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_key_roundtrip() {
        let id = EntityId::from("37i9dQZF1DX0XUsuxWHRQd");
        let key = tag_key(&id);
        assert_eq!(key, "tags:37i9dQZF1DX0XUsuxWHRQd");
        assert_eq!(entity_id_from_key(&key), Some(id));
    }

    #[test]
    fn test_index_and_cache_keys_are_not_entities() {
        assert!(!is_entity_tag_key(INDEX_KEY));
        assert!(!is_entity_tag_key("tags:cache:metadata:abc"));
        assert!(!is_entity_tag_key("playlist-tags-settings.use-metadata-cache"));
        assert_eq!(entity_id_from_key("tags:cache:contents:abc"), None);
        assert_eq!(entity_id_from_key("tags:"), None);
    }

    #[test]
    fn test_is_cache_key() {
        assert!(is_cache_key("tags:cache:contents:abc"));
        assert!(!is_cache_key("tags:abc"));
    }
}
