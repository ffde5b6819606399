//! Storage usage report
//!
//! Sizes are key length plus value length, the same measure the quota uses.

use crate::storage::keys::TAG_KEY_PREFIX;
use crate::storage::{StorageBackend, StorageError, entry_size};
use byte_unit::{Byte, UnitType};
use std::fmt;

/// One key and the space it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySize {
    pub key: String,
    pub bytes: u64,
}

/// Sizes of every `tags:` key, largest first, with totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySizeReport {
    pub entries: Vec<KeySize>,
    /// Space used by keys under `tags:`
    pub tag_total: u64,
    /// Space used by every key in the store
    pub all_total: u64,
}

/// Measure every key in `storage`
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be iterated or read.
pub fn key_sizes(storage: &dyn StorageBackend) -> Result<KeySizeReport, StorageError> {
    let mut report = KeySizeReport::default();

    for key in storage.keys()? {
        let Some(value) = storage.get(&key)? else {
            continue;
        };
        let bytes = entry_size(&key, &value);
        report.all_total += bytes;

        if key.starts_with(TAG_KEY_PREFIX) {
            report.tag_total += bytes;
            report.entries.push(KeySize { key, bytes });
        }
    }

    report
        .entries
        .sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.key.cmp(&b.key)));
    Ok(report)
}

/// Human-readable binary size, e.g. `1.5 KiB`
#[must_use]
pub fn format_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

impl fmt::Display for KeySizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} = {}", entry.key, format_size(entry.bytes))?;
        }
        write!(
            f,
            "Total = {} / {}",
            format_size(self.tag_total),
            format_size(self.all_total)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_key_sizes_largest_first() {
        let storage = MemoryStorage::new();
        storage.set("tags:a", r#"["rock"]"#).unwrap();
        storage.set("tags:cache:contents:a", r#"{"items":[{"uri":"t1"}]}"#).unwrap();
        storage.set("settings.theme", "dark").unwrap();

        let report = key_sizes(&storage).unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].key, "tags:cache:contents:a");
        assert_eq!(report.entries[1].bytes, 14);
        assert_eq!(report.tag_total, 14 + 45);
        assert_eq!(report.all_total, report.tag_total + 18);
    }

    #[test]
    fn test_report_display() {
        let storage = MemoryStorage::new();
        storage.set("tags:a", r#"["rock"]"#).unwrap();

        let text = key_sizes(&storage).unwrap().to_string();
        assert_eq!(text, "tags:a = 14 B\nTotal = 14 B / 14 B");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(2048), "2 KiB");
    }
}
