//! Tag-folder command

use super::Result;
use crate::PlaylistTagsError;
use crate::db::TagStore;
use crate::output;
use crate::provider::PlaylistProvider;

/// Execute the tag-folder command - add tags to every playlist below a folder
///
/// # Errors
/// Returns an error if the library cannot be read or the folder does not exist
pub async fn execute(
    store: &TagStore,
    provider: &dyn PlaylistProvider,
    folder: &str,
    tags: &[String],
    quiet: bool,
) -> Result<()> {
    let root = provider.rootlist().await?;
    let found = root
        .find_folder(folder)
        .ok_or_else(|| PlaylistTagsError::InvalidInput(format!("Folder '{folder}' not found")))?;

    let ids = found.entity_ids();
    if ids.is_empty() {
        if !quiet {
            println!("Folder '{folder}' holds no playlists.");
        }
        return Ok(());
    }

    let summary = store.add_tags_to_many(&ids, &tags.join(" "));
    if !quiet {
        output::print_summary(&summary, "Tag Folder");
    }
    Ok(())
}
