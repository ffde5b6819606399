//! pltags CLI application entry point
//!
//! Command-line front end for the playlist tag store. Tags live in a local
//! sled database; playlist data (titles, tracks, the folder tree) comes from
//! a library snapshot file.
//!
//! # Usage
//!
//! ```bash
//! # Tag a playlist and search
//! pltags tag spotify:playlist:37i9dQZF1DX0XUsuxWHRQd rock chill
//! pltags search rock !live --all
//!
//! # Derive tags for the whole library
//! pltags --library library.json mass-tag artist
//!
//! # Back up and restore
//! pltags export -o tags.txt
//! pltags import tags.txt
//! ```
//!
//! # Configuration
//!
//! On first run, pltags will prompt for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/playlist-tags/config.toml` on Linux).

use playlist_tags::{
    PlaylistTagsError,
    cache::CacheLayer,
    cli::{CacheCommands, Cli, Commands, ConfigCommands, search_mode},
    commands,
    config::PlaylistTagsConfig,
    db::{SearchMode, TagStore},
    masstag::MassTagOperator,
    notify::ConsoleNotifier,
    provider::{SharedProvider, SnapshotProvider},
    storage::{SharedStorage, SledStorage},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, PlaylistTagsError>;

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default = if verbose { "playlist_tags=debug,pltags=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Open the library snapshot the provider serves from
fn open_provider(library: Option<&Path>) -> Result<SharedProvider> {
    let path = library.ok_or_else(|| {
        PlaylistTagsError::InvalidInput(
            "No library configured. Pass --library <PATH> or run 'pltags config set library=<PATH>'.".into(),
        )
    })?;

    let provider = SnapshotProvider::load(path)?;
    tracing::debug!(path = %path.display(), playlists = provider.len(), "loaded library snapshot");
    Ok(Arc::new(provider))
}

/// Handle config subcommands, which never open the database
fn handle_config_command(mut config: PlaylistTagsConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                PlaylistTagsError::InvalidInput("Invalid format. Use: pltags config set key=value".into())
            })?;

            config.set(key.trim(), value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key.trim(), config.get(key.trim())?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get(key)?);
        }
    }
    Ok(())
}

/// Resources commands open on demand, so `config` never touches the database
struct Session<'a> {
    config: &'a PlaylistTagsConfig,
    db: Option<PathBuf>,
    library: Option<&'a Path>,
    notifier: Arc<ConsoleNotifier>,
}

impl Session<'_> {
    fn open_store(&self) -> Result<TagStore> {
        let db_path = match &self.db {
            Some(path) => path.clone(),
            None => self.config.database_path()?,
        };
        let storage: SharedStorage = Arc::new(SledStorage::open(&db_path, self.config.quota())?);
        tracing::debug!(path = %db_path.display(), "opened tag database");
        Ok(TagStore::new(storage).with_notifier(self.notifier.clone()))
    }

    fn provider(&self) -> Result<SharedProvider> {
        open_provider(self.library)
    }

    fn cache(&self, store: &TagStore) -> Result<CacheLayer> {
        Ok(CacheLayer::new(store.storage().clone(), self.provider()?, self.config.cache)
            .with_notifier(self.notifier.clone()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = PlaylistTagsConfig::load_or_setup()?;
    let quiet = cli.quiet || config.quiet;
    let session = Session {
        config: &config,
        db: cli.db,
        library: cli.library.as_deref().or(config.library.as_deref()),
        notifier: Arc::new(ConsoleNotifier::new(quiet)),
    };

    match cli.command {
        Commands::Config { command } => handle_config_command(config.clone(), &command, quiet)?,
        Commands::Tag { playlist, tags } => commands::tag(&session.open_store()?, &playlist, &tags, quiet)?,
        Commands::Untag { playlist, tag } => {
            commands::tag::untag(&session.open_store()?, &playlist, &tag, quiet)?;
        }
        Commands::Show { playlist } => commands::tag::show(&session.open_store()?, &playlist, quiet)?,
        Commands::TagFolder { folder, tags } => {
            let provider = session.provider()?;
            commands::tag_folder(&session.open_store()?, provider.as_ref(), &folder, &tags, quiet).await?;
        }
        Commands::Search { terms, all, any, live } => {
            let store = session.open_store()?;
            let mode = search_mode(all, any, config.filter.mode);
            if live {
                commands::search::live(&store, mode, config.filter.debounce(), quiet).await?;
            } else {
                commands::search(&store, &terms, mode, quiet)?;
            }
        }
        Commands::Tags { desc, counts } => commands::tags(&session.open_store()?, desc, counts, quiet)?,
        Commands::Untagged => {
            let provider = session.provider()?;
            commands::tags::untagged(&session.open_store()?, provider.as_ref(), quiet).await?;
        }
        Commands::RemoveMatching { pattern, min_count, yes } => {
            commands::cleanup::remove_matching(&session.open_store()?, &pattern, min_count, yes, quiet)?;
        }
        Commands::MassTag {
            rule,
            threshold,
            include_non_latin,
            tag,
        } => {
            let rule = commands::masstag::build_rule(rule, &config.mass_tag, threshold, include_non_latin, tag);
            let operator = MassTagOperator::new(session.open_store()?, session.provider()?);
            commands::mass_tag(&operator, &rule, quiet).await?;
        }
        Commands::Export {
            exclude_local_files,
            clipboard,
            output,
        } => {
            let exclude = exclude_local_files.then_some(config.mass_tag.local_files_tag.as_str());
            commands::transfer::export(&session.open_store()?, exclude, clipboard, output.as_deref(), quiet)?;
        }
        Commands::Import { path, clipboard } => {
            commands::transfer::import(&session.open_store()?, path.as_deref(), clipboard, quiet)?;
        }
        Commands::Cache {
            command: CacheCommands::Clear { namespace },
        } => {
            let store = session.open_store()?;
            commands::cache::clear(store.storage().as_ref(), namespace.into(), quiet)?;
        }
        Commands::Sizes => commands::cache::sizes(session.open_store()?.storage().as_ref(), quiet)?,
        Commands::Queue { terms, all, shuffle } => {
            let store = session.open_store()?;
            let mode = if all { SearchMode::All } else { config.filter.mode };
            commands::queue::queue(&store, &session.cache(&store)?, &terms, mode, shuffle, quiet).await?;
        }
        Commands::Playlists { terms, all, sort } => {
            let store = session.open_store()?;
            let mode = if all { SearchMode::All } else { config.filter.mode };
            commands::queue::playlists(&store, &session.cache(&store)?, &terms, mode, sort.into(), quiet).await?;
        }
        Commands::ClearAll { yes } => commands::cleanup::clear_all(&session.open_store()?, yes, quiet)?,
    }

    Ok(())
}
