//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs the operation against the tag store and its collaborators.

pub mod cache;
pub mod cleanup;
pub mod folder;
pub mod masstag;
pub mod queue;
pub mod search;
pub mod tag;
pub mod tags;
pub mod transfer;

// Re-export execute functions for convenience
pub use folder::execute as tag_folder;
pub use masstag::execute as mass_tag;
pub use search::execute as search;
pub use tag::execute as tag;
pub use tags::execute as tags;

use crate::PlaylistTagsError;
use dialoguer::Confirm;

type Result<T> = std::result::Result<T, PlaylistTagsError>;

/// Ask before a destructive operation; `yes` skips the prompt
fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| PlaylistTagsError::InvalidInput(format!("Failed to get confirmation: {e}")))
}
