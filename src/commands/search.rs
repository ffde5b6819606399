//! Search command - find playlists by tag

use super::Result;
use crate::PlaylistTagsError;
use crate::db::{EntityId, SearchMode, TagStore};
use crate::debounce::Debouncer;
use crate::output;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Execute the search command
///
/// # Errors
/// Returns an error if the tag store cannot be read
pub fn execute(store: &TagStore, terms: &[String], mode: SearchMode, quiet: bool) -> Result<()> {
    let ids = store.search(&terms.join(" "), mode)?;
    print_matches(store, &ids, quiet)
}

/// Live filter: every stdin line replaces the query, and only a line left
/// alone for `delay` runs
///
/// # Errors
/// Returns an error if stdin cannot be read
pub async fn live(store: &TagStore, mode: SearchMode, delay: Duration, quiet: bool) -> Result<()> {
    let mut debouncer = Debouncer::new(delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = None;

    while let Some(line) = lines.next_line().await? {
        let store = store.clone();
        last = Some(debouncer.schedule(async move {
            let result = store
                .search(&line, mode)
                .map_err(PlaylistTagsError::from)
                .and_then(|ids| print_matches(&store, &ids, quiet));
            if let Err(e) = result {
                tracing::warn!(query = %line, error = %e, "live search failed");
            }
        }));
    }

    if let Some(handle) = last {
        handle.fired().await;
    }
    Ok(())
}

fn print_matches(store: &TagStore, ids: &[EntityId], quiet: bool) -> Result<()> {
    if ids.is_empty() {
        if !quiet {
            println!("No playlists found.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Found {} playlist(s):", ids.len());
    }
    for id in ids {
        let tags = store.tags_of(id)?;
        println!("{}", output::playlist_with_tags(id, &tags, quiet));
    }
    Ok(())
}
