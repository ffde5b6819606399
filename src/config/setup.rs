//! Interactive setup wizard for first-time configuration

use super::PlaylistTagsConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for the database and library locations
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
pub fn first_time_setup() -> Result<PlaylistTagsConfig, ConfigError> {
    println!("Welcome to playlist-tags! Let's set up your tag database.\n");

    let default_path = PlaylistTagsConfig::default_database_path()?;
    let db_path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Database location")
        .default(default_path.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let library: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Library snapshot (JSON, leave empty to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = PlaylistTagsConfig {
        database: Some(PathBuf::from(db_path)),
        library: (!library.trim().is_empty()).then(|| PathBuf::from(library.trim())),
        ..PlaylistTagsConfig::default()
    };

    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
