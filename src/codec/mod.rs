//! Plain-text import and export of the tag store
//!
//! One line per tagged playlist, the storage key and its stored JSON value
//! joined by ` === `:
//!
//! ```text
//! tags:37i9dQZF1DX0XUsuxWHRQd === ["chill","[year:2019]"]
//! tags:5ZzKhbS3bbA2uQyCTgKz9b === ["rock"]
//! ```
//!
//! Export walks keys in ascending order and never includes cache entries or
//! the index. Import also accepts the index key; its ids are merged into the
//! current index once the tag lines are in, skipping ids with no tag set.

pub mod error;

pub use error::CodecError;

use crate::db::{EntityId, TagStore};
use crate::storage::keys::{self, INDEX_KEY, TAG_KEY_PREFIX};

/// Separator between key and value on each line
pub const LINE_DELIMITER: &str = " === ";

/// Outcome of an import
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Non-blank lines read, including the one that halted the import
    pub attempted: usize,
    /// Lines written to storage
    pub applied: usize,
    /// Lines ignored as malformed or foreign
    pub skipped: usize,
    /// Whether the storage quota stopped the import early
    pub halted: bool,
}

/// Serialize every tag set
///
/// With `exclude_tag` set, playlists whose stored value contains that text
/// anywhere are left out, so a marker also drops tags that embed it.
///
/// # Errors
///
/// Returns `CodecError` if storage cannot be read.
pub fn export(store: &TagStore, exclude_tag: Option<&str>) -> Result<String, CodecError> {
    let storage = store.storage();
    let mut lines = Vec::new();

    for key in storage.keys_with_prefix(TAG_KEY_PREFIX)? {
        if !keys::is_entity_tag_key(&key) {
            continue;
        }
        let Some(value) = storage.get(&key)? else {
            continue;
        };

        if exclude_tag.is_some_and(|excluded| value.contains(excluded)) {
            continue;
        }

        lines.push(format!("{key}{LINE_DELIMITER}{value}"));
    }

    tracing::info!(count = lines.len(), "exported tag sets");
    Ok(lines.join("\n"))
}

/// Apply exported lines to the store
///
/// Each valid tag line overwrites that playlist's tag set and registers it in
/// the index. Index lines are held back until every tag line is in, then
/// only ids that have a tag set are merged into the index. The first quota
/// failure stops the import; lines applied before it stay applied.
///
/// # Errors
///
/// Returns `CodecError` for storage failures other than the quota.
pub fn import(store: &TagStore, text: &str) -> Result<ImportReport, CodecError> {
    let mut report = ImportReport::default();
    let mut indexed = Vec::new();
    let mut index_lines = 0;

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        report.attempted += 1;

        match parse_line(line) {
            Some(Entry::Tags(id, key, value)) => match apply_tags(store, &id, &key, value) {
                Ok(()) => report.applied += 1,
                Err(err) if err.is_quota_exceeded() => {
                    tracing::warn!(applied = report.applied, "import halted by storage quota");
                    report.halted = true;
                    break;
                }
                Err(err) => return Err(err),
            },
            Some(Entry::Index(ids)) => {
                indexed.extend(ids);
                index_lines += 1;
            }
            None => {
                tracing::debug!(line, "skipping import line");
                report.skipped += 1;
            }
        }
    }

    if !report.halted && index_lines > 0 {
        match register_existing(store, &indexed) {
            Ok(()) => report.applied += index_lines,
            Err(err) if err.is_quota_exceeded() => {
                tracing::warn!("index merge halted by storage quota");
                report.halted = true;
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        attempted = report.attempted,
        applied = report.applied,
        skipped = report.skipped,
        "imported tag sets"
    );
    Ok(report)
}

/// Write one raw tag set and index it, restoring the old value if indexing fails
fn apply_tags(store: &TagStore, id: &EntityId, key: &str, value: &str) -> Result<(), CodecError> {
    let storage = store.storage();
    let previous = storage.get(key)?;
    store.set(key, value)?;

    if let Err(err) = store.register(std::slice::from_ref(id)) {
        let rollback = match &previous {
            Some(old) => storage.set(key, old),
            None => storage.remove(key),
        };
        if let Err(rollback) = rollback {
            tracing::warn!(%key, error = %rollback, "failed to roll back unindexed tag set");
        }
        return Err(err.into());
    }
    Ok(())
}

/// Merge the ids of index lines that have a stored tag set
fn register_existing(store: &TagStore, ids: &[EntityId]) -> Result<(), CodecError> {
    let storage = store.storage();
    let mut present = Vec::with_capacity(ids.len());
    for id in ids {
        if storage.get(&keys::tag_key(id))?.is_some() {
            present.push(id.clone());
        } else {
            tracing::debug!(%id, "dropping index entry without a tag set");
        }
    }
    store.register(&present)?;
    Ok(())
}

enum Entry<'a> {
    Tags(EntityId, String, &'a str),
    Index(Vec<EntityId>),
}

fn parse_line(line: &str) -> Option<Entry<'_>> {
    let mut parts = line.split(LINE_DELIMITER);
    let (key, value) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let key = key.trim();
    let value = value.trim();

    if key == INDEX_KEY {
        let ids: Vec<EntityId> = serde_json::from_str(value).ok()?;
        return Some(Entry::Index(ids));
    }

    let id = keys::entity_id_from_key(key)?;
    let tags: Vec<String> = serde_json::from_str(value).ok()?;
    if tags.is_empty() {
        return None;
    }
    Some(Entry::Tags(id, key.to_string(), value))
}
