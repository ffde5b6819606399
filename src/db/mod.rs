//! Tag store
//!
//! Owns the per-playlist tag sets and the index of tagged playlists, both
//! persisted as JSON through a [`StorageBackend`](crate::storage::StorageBackend):
//!
//! - `tags:<id>`: the playlist's tags, in insertion order
//! - `tags:taggedPlaylistURIs`: every id whose tag set is non-empty
//!
//! A playlist is in the index exactly when it has a tag set. The first add
//! registers the id and removing the last tag deregisters it.
//!
//! Writes rejected by the storage quota are reported through the store's
//! [`Notifier`] before the error is returned.

use crate::notify::{LogNotifier, Notification, Notifier};
use crate::sort::{self, SortOrder};
use crate::storage::keys::{self, INDEX_KEY};
use crate::storage::{SharedStorage, StorageError};
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

pub mod error;
pub mod query;
pub mod summary;
pub mod types;

pub use error::DbError;
pub use query::{Query, SearchMode};
pub use summary::{BulkOpSummary, RemovalSummary};
pub use types::EntityId;

/// Split free-form input into tags on any whitespace
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Per-playlist tag sets over a key-value store
#[derive(Clone)]
pub struct TagStore {
    storage: SharedStorage,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for TagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagStore").finish_non_exhaustive()
    }
}

impl TagStore {
    /// Create a tag store over `storage`, logging notifications
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Replace the notification sink
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub const fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Tags of `id`, empty when the playlist has none
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage cannot be read or the stored set is corrupt.
    pub fn tags_of(&self, id: &EntityId) -> Result<Vec<String>, DbError> {
        Ok(self.read_tags(id)?.unwrap_or_default())
    }

    /// Whether `id` currently has a tag set
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage cannot be read.
    pub fn contains(&self, id: &EntityId) -> Result<bool, DbError> {
        Ok(self.storage.get(&keys::tag_key(id))?.is_some())
    }

    /// Every indexed playlist, in index order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage cannot be read or the index is corrupt.
    pub fn tagged_ids(&self) -> Result<Vec<EntityId>, DbError> {
        match self.storage.get(INDEX_KEY)? {
            Some(value) => serde_json::from_str(&value).map_err(|source| DbError::Corrupt {
                key: INDEX_KEY.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Number of indexed playlists
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the index cannot be read.
    pub fn count(&self) -> Result<usize, DbError> {
        Ok(self.tagged_ids()?.len())
    }

    /// Add whitespace-separated tags from `raw` to `id`
    ///
    /// Returns the tags that were actually new.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails. A quota failure abandons the write
    /// for this playlist and is also reported to the notifier.
    pub fn add_tags(&self, id: &EntityId, raw: &str) -> Result<Vec<String>, DbError> {
        self.add_tag_list(id, &split_tags(raw))
    }

    /// Append `tags` to `id`, skipping any already present
    ///
    /// Insertion order is kept. Nothing is written when every tag is already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails. When registering a new playlist in
    /// the index fails, its freshly written tag set is removed again.
    pub fn add_tag_list(&self, id: &EntityId, tags: &[String]) -> Result<Vec<String>, DbError> {
        let existing = self.read_tags(id)?;
        let is_new = existing.is_none();
        let mut current = existing.unwrap_or_default();

        let mut added = Vec::new();
        for tag in tags {
            let tag = tag.trim();
            if tag.is_empty() || current.iter().any(|t| t == tag) {
                continue;
            }
            current.push(tag.to_string());
            added.push(tag.to_string());
        }

        if added.is_empty() {
            return Ok(added);
        }

        self.write_tags(id, &current)?;

        if is_new {
            if let Err(err) = self.register(std::slice::from_ref(id)) {
                // No tag set may exist without an index entry.
                if let Err(rollback) = self.storage.remove(&keys::tag_key(id)) {
                    tracing::warn!(id = %id, error = %rollback, "failed to roll back unindexed tag set");
                }
                return Err(err);
            }
        }

        tracing::debug!(id = %id, added = ?added, "added tags");
        Ok(added)
    }

    /// Add the same tags to many playlists
    ///
    /// A failure on one playlist does not stop the rest.
    #[must_use]
    pub fn add_tags_to_many(&self, ids: &[EntityId], raw: &str) -> BulkOpSummary {
        let tags = split_tags(raw);
        let mut summary = BulkOpSummary::new();

        for id in ids {
            match self.add_tag_list(id, &tags) {
                Ok(added) if added.is_empty() => summary.add_skip(),
                Ok(_) => summary.add_success(),
                Err(e) => summary.add_error(format!("{id}: {e}")),
            }
        }

        summary
    }

    /// Remove exactly `tag` from `id`
    ///
    /// Returns whether the tag was present. Removing the last tag deletes the
    /// tag set and drops the playlist from the index.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails.
    pub fn remove_tag(&self, id: &EntityId, tag: &str) -> Result<bool, DbError> {
        let Some(mut current) = self.read_tags(id)? else {
            return Ok(false);
        };

        let before = current.len();
        current.retain(|t| t != tag);
        if current.len() == before {
            return Ok(false);
        }

        if current.is_empty() {
            self.storage.remove(&keys::tag_key(id))?;
            self.deregister(&HashSet::from([id.clone()]))?;
        } else {
            self.write_tags(id, &current)?;
        }

        tracing::debug!(id = %id, tag, "removed tag");
        Ok(true)
    }

    /// Remove tags matching `pattern` from every indexed playlist
    ///
    /// With `min_count == 0` every match is removed. Otherwise a matching tag
    /// survives wherever it is carried by at least `min_count` playlists.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails or a tag set is corrupt.
    pub fn remove_matching(&self, pattern: &Regex, min_count: usize) -> Result<RemovalSummary, DbError> {
        let sets = self.tag_sets()?;
        let counts = count_tags(&sets);
        let mut summary = RemovalSummary::default();
        let mut emptied = HashSet::new();

        for (id, mut tags) in sets {
            let before = tags.len();
            tags.retain(|tag| {
                let count = counts.get(tag).copied().unwrap_or(0);
                !(pattern.is_match(tag) && (min_count == 0 || count < min_count))
            });
            let removed = before - tags.len();
            if removed == 0 {
                continue;
            }

            summary.entities_changed += 1;
            summary.tags_removed += removed;

            if tags.is_empty() {
                self.storage.remove(&keys::tag_key(&id))?;
                emptied.insert(id);
            } else {
                self.write_tags(&id, &tags)?;
            }
        }

        summary.entities_cleared = emptied.len();
        if !emptied.is_empty() {
            self.deregister(&emptied)?;
        }

        tracing::info!(
            pattern = pattern.as_str(),
            min_count,
            removed = summary.tags_removed,
            "removed matching tags"
        );
        Ok(summary)
    }

    /// Compile `pattern` and remove matching tags
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidPattern` before touching any playlist when
    /// `pattern` is not a valid regular expression.
    pub fn remove_matching_pattern(&self, pattern: &str, min_count: usize) -> Result<RemovalSummary, DbError> {
        let regex = Regex::new(pattern)?;
        self.remove_matching(&regex, min_count)
    }

    /// Every distinct tag, plain tags before bracketed ones
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails or a tag set is corrupt.
    pub fn unique_tags(&self, order: SortOrder) -> Result<Vec<String>, DbError> {
        let unique: BTreeSet<String> = self
            .tag_sets()?
            .into_iter()
            .flat_map(|(_, tags)| tags)
            .collect();
        Ok(sort::sort_tags(unique.into_iter().collect(), order))
    }

    /// How many playlists carry each tag, most used first
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails or a tag set is corrupt.
    pub fn tag_counts(&self) -> Result<Vec<(String, usize)>, DbError> {
        let sets = self.tag_sets()?;
        let mut counts: Vec<(String, usize)> = count_tags(&sets).into_iter().collect();
        counts.sort_by(|(a, x), (b, y)| y.cmp(x).then_with(|| a.cmp(b)));
        Ok(counts)
    }

    /// Delete every tag set and the index, leaving caches alone
    ///
    /// Returns the number of keys deleted.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails.
    pub fn clear_all(&self) -> Result<usize, DbError> {
        let doomed: Vec<String> = self
            .storage
            .keys_with_prefix(keys::TAG_KEY_PREFIX)?
            .into_iter()
            .filter(|key| !keys::is_cache_key(key))
            .collect();

        for key in &doomed {
            self.storage.remove(key)?;
        }

        tracing::info!(count = doomed.len(), "cleared all tags");
        Ok(doomed.len())
    }

    /// Append ids missing from the index
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the index cannot be read or written.
    pub(crate) fn register(&self, ids: &[EntityId]) -> Result<(), DbError> {
        let mut index = self.tagged_ids()?;
        let before = index.len();
        for id in ids {
            if !index.contains(id) {
                index.push(id.clone());
            }
        }
        if index.len() == before {
            return Ok(());
        }
        self.write_index(&index)
    }

    fn deregister(&self, ids: &HashSet<EntityId>) -> Result<(), DbError> {
        let mut index = self.tagged_ids()?;
        index.retain(|id| !ids.contains(id));
        self.write_index(&index)
    }

    fn write_index(&self, index: &[EntityId]) -> Result<(), DbError> {
        let value = serde_json::to_string(index)?;
        self.set(INDEX_KEY, &value)
    }

    fn read_tags(&self, id: &EntityId) -> Result<Option<Vec<String>>, DbError> {
        let key = keys::tag_key(id);
        match self.storage.get(&key)? {
            Some(value) => serde_json::from_str(&value)
                .map(Some)
                .map_err(|source| DbError::Corrupt { key, source }),
            None => Ok(None),
        }
    }

    fn write_tags(&self, id: &EntityId, tags: &[String]) -> Result<(), DbError> {
        let value = serde_json::to_string(tags)?;
        self.set(&keys::tag_key(id), &value)
    }

    /// Every indexed playlist with its tags; ids without a stored set are skipped
    pub(crate) fn tag_sets(&self) -> Result<Vec<(EntityId, Vec<String>)>, DbError> {
        let mut sets = Vec::new();
        for id in self.tagged_ids()? {
            if let Some(tags) = self.read_tags(&id)? {
                sets.push((id, tags));
            }
        }
        Ok(sets)
    }

    /// Store a raw value, reporting quota failures to the notifier
    pub(crate) fn set(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.storage.set(key, value).map_err(|err| {
            if let StorageError::QuotaExceeded { .. } = err {
                tracing::warn!(key, "storage quota exceeded");
                self.notifier.notify(Notification::quota_exceeded());
            }
            DbError::from(err)
        })
    }
}

fn count_tags(sets: &[(EntityId, Vec<String>)]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for (_, tags) in sets {
        let distinct: HashSet<&str> = tags.iter().map(String::as_str).collect();
        for tag in distinct {
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }
    counts
}
