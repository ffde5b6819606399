//! Configuration module for playlist-tags
//!
//! Stored as TOML at `<config_dir>/playlist-tags/config.toml`. Every field
//! has a default, so a partial or missing file is fine.

mod setup;

pub use setup::first_time_setup;

use crate::cache::CacheSettings;
use crate::db::SearchMode;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::masstag::artists::DEFAULT_ARTIST_THRESHOLD;
use crate::masstag::{DEFAULT_LOCAL_FILES_TAG, DEFAULT_UNPLAYABLE_TAG, MassTagRule};
use crate::storage::DEFAULT_QUOTA_BYTES;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Keys accepted by [`PlaylistTagsConfig::get`] and [`PlaylistTagsConfig::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "database",
    "library",
    "quota_bytes",
    "quiet",
    "cache.metadata",
    "cache.contents",
    "mass_tag.artist_threshold",
    "mass_tag.exclude_non_latin",
    "mass_tag.local_files_tag",
    "mass_tag.unplayable_tag",
    "filter.debounce_ms",
    "filter.mode",
];

/// Options for the mass-tag rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassTagSettings {
    pub artist_threshold: usize,
    pub exclude_non_latin: bool,
    pub local_files_tag: String,
    pub unplayable_tag: String,
}

impl Default for MassTagSettings {
    fn default() -> Self {
        Self {
            artist_threshold: DEFAULT_ARTIST_THRESHOLD,
            exclude_non_latin: true,
            local_files_tag: DEFAULT_LOCAL_FILES_TAG.to_string(),
            unplayable_tag: DEFAULT_UNPLAYABLE_TAG.to_string(),
        }
    }
}

impl MassTagSettings {
    #[must_use]
    pub const fn artist_rule(&self) -> MassTagRule {
        MassTagRule::Artist {
            threshold: self.artist_threshold,
            exclude_non_latin: self.exclude_non_latin,
        }
    }

    #[must_use]
    pub fn local_files_rule(&self) -> MassTagRule {
        MassTagRule::LocalFiles {
            tag: self.local_files_tag.clone(),
        }
    }

    #[must_use]
    pub fn unplayable_rule(&self) -> MassTagRule {
        MassTagRule::Unplayable {
            tag: self.unplayable_tag.clone(),
        }
    }
}

/// Interactive filter behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub debounce_ms: u64,
    pub mode: SearchMode,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            debounce_ms: u64::try_from(DEFAULT_DEBOUNCE.as_millis()).unwrap_or(420),
            mode: SearchMode::Any,
        }
    }
}

impl FilterSettings {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistTagsConfig {
    /// Directory of the tag database
    pub database: Option<PathBuf>,

    /// JSON library snapshot serving playlist data
    pub library: Option<PathBuf>,

    /// Storage quota in bytes, 0 for unlimited
    pub quota_bytes: u64,

    /// Suppress informational output by default
    pub quiet: bool,

    pub cache: CacheSettings,
    pub mass_tag: MassTagSettings,
    pub filter: FilterSettings,
}

impl Default for PlaylistTagsConfig {
    fn default() -> Self {
        Self {
            database: None,
            library: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
            quiet: false,
            cache: CacheSettings::default(),
            mass_tag: MassTagSettings::default(),
            filter: FilterSettings::default(),
        }
    }
}

impl PlaylistTagsConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("playlist-tags").join("config.toml"))
    }

    /// Default database directory under the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn default_database_path() -> Result<PathBuf, ConfigError> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?;

        Ok(data_dir.join("playlist-tags").join("db"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        if Self::config_path()?.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or its directory cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// The configured database directory, or the default one
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no database is configured and the data
    /// directory cannot be determined.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Self::default_database_path(),
        }
    }

    /// The storage quota, `None` when unlimited
    #[must_use]
    pub const fn quota(&self) -> Option<u64> {
        if self.quota_bytes == 0 {
            None
        } else {
            Some(self.quota_bytes)
        }
    }

    /// Read one setting as text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for unknown keys.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let display_path = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        let value = match key {
            "database" => display_path(&self.database),
            "library" => display_path(&self.library),
            "quota_bytes" => self.quota_bytes.to_string(),
            "quiet" => self.quiet.to_string(),
            "cache.metadata" => self.cache.metadata.to_string(),
            "cache.contents" => self.cache.contents.to_string(),
            "mass_tag.artist_threshold" => self.mass_tag.artist_threshold.to_string(),
            "mass_tag.exclude_non_latin" => self.mass_tag.exclude_non_latin.to_string(),
            "mass_tag.local_files_tag" => self.mass_tag.local_files_tag.clone(),
            "mass_tag.unplayable_tag" => self.mass_tag.unplayable_tag.clone(),
            "filter.debounce_ms" => self.filter.debounce_ms.to_string(),
            "filter.mode" => self.filter.mode.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Update one setting from text, without saving
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown keys or values of the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "database" => self.database = optional_path(value),
            "library" => self.library = optional_path(value),
            "quota_bytes" => self.quota_bytes = parse(key, value)?,
            "quiet" => self.quiet = parse(key, value)?,
            "cache.metadata" => self.cache.metadata = parse(key, value)?,
            "cache.contents" => self.cache.contents = parse(key, value)?,
            "mass_tag.artist_threshold" => self.mass_tag.artist_threshold = parse(key, value)?,
            "mass_tag.exclude_non_latin" => self.mass_tag.exclude_non_latin = parse(key, value)?,
            "mass_tag.local_files_tag" => self.mass_tag.local_files_tag = single_tag(key, value)?,
            "mass_tag.unplayable_tag" => self.mass_tag.unplayable_tag = single_tag(key, value)?,
            "filter.debounce_ms" => self.filter.debounce_ms = parse(key, value)?,
            "filter.mode" => {
                self.filter.mode = value.parse().map_err(ConfigError::Message)?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::NotFound(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}'")))
}

fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn single_tag(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Message(format!(
            "Invalid value for {key}: '{value}'. A tag is one word"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PlaylistTagsConfig::default();
        assert!(config.database.is_none());
        assert_eq!(config.quota(), Some(5 * 1024 * 1024));
        assert!(config.cache.metadata && config.cache.contents);
        assert_eq!(config.mass_tag.artist_threshold, 5);
        assert!(config.mass_tag.exclude_non_latin);
        assert_eq!(config.filter.debounce(), Duration::from_millis(420));
        assert_eq!(config.filter.mode, SearchMode::Any);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = PlaylistTagsConfig::default();
        config.set("library", "/music/library.json").unwrap();
        config.set("cache.contents", "false").unwrap();
        config.set("filter.mode", "all").unwrap();
        config.save_to(&path).unwrap();

        let loaded = PlaylistTagsConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "quiet = true\n[mass_tag]\nartist_threshold = 8\n").unwrap();

        let loaded = PlaylistTagsConfig::load_from(&path).unwrap();
        assert!(loaded.quiet);
        assert_eq!(loaded.mass_tag.artist_threshold, 8);
        assert_eq!(loaded.mass_tag.local_files_tag, "[contains-local-files]");
        assert!(loaded.cache.metadata);
    }

    #[test]
    fn test_get_and_set() {
        let mut config = PlaylistTagsConfig::default();

        config.set("quota_bytes", "0").unwrap();
        assert_eq!(config.quota(), None);

        config.set("mass_tag.unplayable_tag", "[dead]").unwrap();
        assert_eq!(config.get("mass_tag.unplayable_tag").unwrap(), "[dead]");
        assert_eq!(config.get("library").unwrap(), "");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = PlaylistTagsConfig::default();

        assert!(config.set("quiet", "maybe").is_err());
        assert!(config.set("filter.mode", "xor").is_err());
        assert!(config.set("mass_tag.local_files_tag", "two words").is_err());
        assert!(matches!(config.get("nope"), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_rules_from_settings() {
        let settings = MassTagSettings {
            artist_threshold: 2,
            ..MassTagSettings::default()
        };
        assert_eq!(
            settings.artist_rule(),
            MassTagRule::Artist {
                threshold: 2,
                exclude_non_latin: true
            }
        );
        assert_eq!(settings.local_files_rule(), MassTagRule::local_files());
    }
}
