//! Tags and untagged commands

use super::Result;
use crate::db::{EntityId, TagStore};
use crate::output;
use crate::provider::PlaylistProvider;
use crate::sort::SortOrder;
use std::collections::HashSet;

/// Execute the tags command - list every tag, or usage counts
///
/// # Errors
/// Returns an error if the tag store cannot be read
pub fn execute(store: &TagStore, desc: bool, counts: bool, quiet: bool) -> Result<()> {
    if counts {
        let counts = store.tag_counts()?;
        if counts.is_empty() && !quiet {
            println!("No tags found.");
        }
        for (tag, count) in counts {
            println!("{}", output::tag_with_count(&tag, count, quiet));
        }
        return Ok(());
    }

    let order = if desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let tags = store.unique_tags(order)?;
    if tags.is_empty() && !quiet {
        println!("No tags found.");
    }
    for tag in tags {
        println!("{tag}");
    }
    Ok(())
}

/// Library playlists with no tags, in library order
///
/// # Errors
/// Returns an error if the library or the tag index cannot be read
pub async fn untagged_ids(store: &TagStore, provider: &dyn PlaylistProvider) -> Result<Vec<EntityId>> {
    let root = provider.rootlist().await?;
    let tagged: HashSet<EntityId> = store.tagged_ids()?.into_iter().collect();

    let mut seen = HashSet::new();
    Ok(root
        .leaves()
        .into_iter()
        .map(|leaf| leaf.id.clone())
        .filter(|id| !tagged.contains(id) && seen.insert(id.clone()))
        .collect())
}

/// Execute the untagged command
///
/// # Errors
/// Returns an error if the library or the tag index cannot be read
pub async fn untagged(store: &TagStore, provider: &dyn PlaylistProvider, quiet: bool) -> Result<()> {
    let ids = untagged_ids(store, provider).await?;
    if !quiet {
        println!("{} untagged playlist(s):", ids.len());
    }
    for id in &ids {
        println!("{}", output::playlist_with_tags(id, &[], quiet));
    }
    Ok(())
}
