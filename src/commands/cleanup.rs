//! Remove-matching and clear-all commands

use super::{Result, confirm};
use crate::db::TagStore;
use regex::Regex;

/// Execute the remove-matching command
///
/// # Errors
/// Returns an error if the pattern is invalid, confirmation fails or storage fails
pub fn remove_matching(store: &TagStore, pattern: &str, min_count: usize, yes: bool, quiet: bool) -> Result<()> {
    let regex = Regex::new(pattern).map_err(crate::db::DbError::from)?;

    let prompt = if min_count == 0 {
        format!("Remove every tag matching /{pattern}/ from all playlists?")
    } else {
        format!("Remove tags matching /{pattern}/ used by fewer than {min_count} playlists?")
    };
    if !confirm(&prompt, yes || quiet)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let summary = store.remove_matching(&regex, min_count)?;
    if !quiet {
        println!(
            "Removed {} tag(s) from {} playlist(s); {} playlist(s) left untagged",
            summary.tags_removed, summary.entities_changed, summary.entities_cleared
        );
    }
    Ok(())
}

/// Execute the clear-all command
///
/// # Errors
/// Returns an error if confirmation fails or storage fails
pub fn clear_all(store: &TagStore, yes: bool, quiet: bool) -> Result<()> {
    let count = store.count()?;
    if !confirm(&format!("Remove all tags from {count} playlist(s)?"), yes || quiet)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let removed = store.clear_all()?;
    if !quiet {
        println!("Cleared {removed} key(s)");
    }
    Ok(())
}
