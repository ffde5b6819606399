//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for pltags using the `clap` crate.
//!
//! # Commands
//!
//! - **tag / untag / show**: manage the tags of one playlist
//! - **search**: find playlists by tag, optionally as a live filter on stdin
//! - **mass-tag**: derive tags across the whole library
//! - **export / import**: move the tag store as plain text
//! - **cache / sizes**: inspect and free storage
//!
//! # Examples
//!
//! ```
//! use playlist_tags::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["pltags", "search", "rock", "!live", "--all"]);
//! assert!(matches!(cli.command, Commands::Search { all: true, .. }));
//! ```

use crate::cache::CacheNamespace;
use crate::db::SearchMode;
use crate::sort::PlaylistSort;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pltags")]
#[command(about = "Tag, filter and bulk-label playlists", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Tag database directory (overrides config)
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Library snapshot JSON (overrides config)
    #[arg(long = "library", value_name = "PATH", global = true)]
    pub library: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add tags to a playlist
    #[command(visible_alias = "t")]
    Tag {
        /// Playlist id or URI
        playlist: String,

        /// Tags to add
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove a tag from a playlist
    Untag {
        /// Playlist id or URI
        playlist: String,

        /// Exact tag to remove
        tag: String,
    },

    /// Show the tags of a playlist
    Show {
        /// Playlist id or URI
        playlist: String,
    },

    /// Add tags to every playlist inside a library folder
    TagFolder {
        /// Folder URI or its trailing id
        folder: String,

        /// Tags to add
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Find playlists by tag (`!tag` excludes)
    #[command(visible_alias = "s")]
    Search {
        /// Filter terms
        #[arg(value_name = "TERMS")]
        terms: Vec<String>,

        /// Require every term (AND)
        #[arg(long = "all", conflicts_with = "any")]
        all: bool,

        /// Require any term (OR)
        #[arg(long = "any", conflicts_with = "all")]
        any: bool,

        /// Read filter lines from stdin and re-run the search as they arrive
        #[arg(long = "live")]
        live: bool,
    },

    /// List every tag in use
    Tags {
        /// Sort Z to A
        #[arg(long = "desc")]
        desc: bool,

        /// Show how many playlists use each tag, most used first
        #[arg(long = "counts", conflicts_with = "desc")]
        counts: bool,
    },

    /// List library playlists that have no tags
    Untagged,

    /// Remove tags matching a regular expression from every playlist
    RemoveMatching {
        /// Regular expression matched against each tag
        pattern: String,

        /// Keep matching tags used by at least this many playlists (0 removes all)
        #[arg(long = "min-count", default_value_t = 0)]
        min_count: usize,

        /// Skip confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Derive tags for every playlist in the library
    MassTag {
        #[arg(value_enum)]
        rule: RuleKind,

        /// Artist rule: most artists tagged individually before using [artist:VA]
        #[arg(long = "threshold", value_name = "N")]
        threshold: Option<usize>,

        /// Artist rule: keep artist names with non-Latin characters
        #[arg(long = "include-non-latin")]
        include_non_latin: bool,

        /// Tag to apply for the local-files and unplayable rules
        #[arg(long = "tag", value_name = "TAG")]
        tag: Option<String>,
    },

    /// Export all tags as text
    Export {
        /// Leave out playlists tagged as holding local files
        #[arg(long = "exclude-local-files")]
        exclude_local_files: bool,

        /// Copy to the clipboard instead of printing
        #[arg(long = "clipboard", conflicts_with = "output")]
        clipboard: bool,

        /// Write to a file instead of printing
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import tags exported earlier
    Import {
        /// File to read (reads stdin when neither this nor --clipboard is given)
        #[arg(value_name = "FILE", conflicts_with = "clipboard")]
        path: Option<PathBuf>,

        /// Read from the clipboard
        #[arg(long = "clipboard")]
        clipboard: bool,
    },

    /// Manage the metadata and contents caches
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Report the storage used by each key
    Sizes,

    /// Print the track URIs of every playlist matching the filter
    Queue {
        /// Filter terms
        #[arg(value_name = "TERMS")]
        terms: Vec<String>,

        /// Require every term (AND)
        #[arg(long = "all")]
        all: bool,

        /// Shuffle the tracks
        #[arg(long = "shuffle")]
        shuffle: bool,
    },

    /// List matching playlists with their titles
    Playlists {
        /// Filter terms
        #[arg(value_name = "TERMS")]
        terms: Vec<String>,

        /// Require every term (AND)
        #[arg(long = "all")]
        all: bool,

        /// Display order
        #[arg(long = "sort", value_enum, default_value_t = SortArg::Title)]
        sort: SortArg,
    },

    /// Remove every tag from every playlist
    ClearAll {
        /// Skip confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommands {
    /// Delete every entry of one cache
    Clear {
        #[arg(value_enum)]
        namespace: NamespaceArg,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., quiet=true)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., quiet)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// Mass-tag rule selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Artist,
    Creator,
    LocalFiles,
    Unplayable,
    Year,
}

/// Cache namespace selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceArg {
    Metadata,
    Contents,
}

impl From<NamespaceArg> for CacheNamespace {
    fn from(arg: NamespaceArg) -> Self {
        match arg {
            NamespaceArg::Metadata => Self::Metadata,
            NamespaceArg::Contents => Self::Contents,
        }
    }
}

/// Playlist display order
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Title,
    TitleDesc,
    Description,
    DescriptionDesc,
    NoCovers,
}

impl From<SortArg> for PlaylistSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => Self::TitleAsc,
            SortArg::TitleDesc => Self::TitleDesc,
            SortArg::Description => Self::DescriptionAsc,
            SortArg::DescriptionDesc => Self::DescriptionDesc,
            SortArg::NoCovers => Self::NoCoversFirst,
        }
    }
}

/// Resolve `--all`/`--any` against the configured default
#[must_use]
pub const fn search_mode(all: bool, any: bool, default: SearchMode) -> SearchMode {
    if all {
        SearchMode::All
    } else if any {
        SearchMode::Any
    } else {
        default
    }
}
