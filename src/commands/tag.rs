//! Tag, untag and show commands

use super::Result;
use crate::PlaylistTagsError;
use crate::db::{EntityId, TagStore};
use crate::output;

/// Execute the tag command - add tags to a playlist
///
/// # Errors
/// Returns an error if the playlist id is invalid or the store rejects the write
pub fn execute(store: &TagStore, playlist: &str, tags: &[String], quiet: bool) -> Result<()> {
    let id = EntityId::parse(playlist)?;
    if tags.iter().all(|tag| tag.trim().is_empty()) {
        return Err(PlaylistTagsError::InvalidInput("No tags provided".into()));
    }

    let added = store.add_tags(&id, &tags.join(" "))?;
    if !quiet {
        if added.is_empty() {
            println!("{id} already has all of these tags");
        } else {
            println!("Tagged {id} with: {}", added.join(", "));
        }
    }
    Ok(())
}

/// Execute the untag command - remove one tag from a playlist
///
/// # Errors
/// Returns an error if the playlist id is invalid or storage fails
pub fn untag(store: &TagStore, playlist: &str, tag: &str, quiet: bool) -> Result<()> {
    let id = EntityId::parse(playlist)?;

    if !store.remove_tag(&id, tag)? {
        return Err(PlaylistTagsError::InvalidInput(format!(
            "{id} is not tagged with '{tag}'"
        )));
    }
    if !quiet {
        println!("Removed '{tag}' from {id}");
    }
    Ok(())
}

/// Execute the show command - print a playlist's tags
///
/// # Errors
/// Returns an error if the playlist id is invalid or storage fails
pub fn show(store: &TagStore, playlist: &str, quiet: bool) -> Result<()> {
    let id = EntityId::parse(playlist)?;
    let tags = store.tags_of(&id)?;

    if quiet {
        for tag in &tags {
            println!("{tag}");
        }
    } else {
        println!("{}", output::playlist_with_tags(&id, &tags, false));
    }
    Ok(())
}
