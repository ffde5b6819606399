//! Cache maintenance and storage size commands

use super::Result;
use crate::cache::{CacheLayer, CacheNamespace};
use crate::stats;
use crate::storage::StorageBackend;

/// Execute the cache clear command
///
/// # Errors
/// Returns an error if the cache keys cannot be listed or removed
pub fn clear(storage: &dyn StorageBackend, namespace: CacheNamespace, quiet: bool) -> Result<()> {
    let removed = CacheLayer::clear_in(storage, namespace)?;
    if !quiet {
        println!("Cleared {removed} {namespace} cache entr{}", if removed == 1 { "y" } else { "ies" });
    }
    Ok(())
}

/// Execute the sizes command
///
/// # Errors
/// Returns an error if the storage cannot be enumerated
pub fn sizes(storage: &dyn StorageBackend, quiet: bool) -> Result<()> {
    let report = stats::key_sizes(storage)?;
    if quiet {
        for entry in &report.entries {
            println!("{}\t{}", entry.key, entry.bytes);
        }
    } else {
        print!("{report}");
    }
    Ok(())
}
