//! Mass tagging over the library tree
//!
//! [`MassTagOperator`] walks a folder tree depth-first and applies one
//! [`MassTagRule`] to every playlist. Playlists are handled one at a time so
//! the provider sees at most one request in flight. A playlist whose fetch or
//! write fails is logged and counted; the walk goes on with its siblings.
//!
//! The walk checks a [`CancellationToken`] before every playlist and races
//! every fetch against it.
//!
//! # Rules
//!
//! | Rule | Skipped when the playlist already has | Tag added |
//! |------|---------------------------------------|-----------|
//! | `Artist` | any `[artist:...]` tag | `[artist:Name]` per artist, or `[artist:VA]` |
//! | `Creator` | any `[by:...]` tag | `[by:Owner-Name]` |
//! | `LocalFiles` | the configured tag | the configured tag, if any track is local |
//! | `Unplayable` | the configured tag | the configured tag, if the playlist cannot play |
//! | `Year` | any `[year:...]` tag | `[year:YYYY]` from a description opening with four digits |

pub mod artists;
pub mod error;

pub use error::MassTagError;

use crate::db::{BulkOpSummary, EntityId, TagStore};
use crate::provider::{Leaf, Node, ProviderError, SharedProvider};
use artists::{ARTIST_TAG_PREFIX, DEFAULT_ARTIST_THRESHOLD};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Prefix of creator tags
pub const CREATOR_TAG_PREFIX: &str = "[by:";

/// Prefix of year tags
pub const YEAR_TAG_PREFIX: &str = "[year:";

/// Default tag for playlists holding local files
pub const DEFAULT_LOCAL_FILES_TAG: &str = "[contains-local-files]";

/// Default tag for playlists that cannot be played
pub const DEFAULT_UNPLAYABLE_TAG: &str = "[unplayable]";

/// How a tag is derived for each playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MassTagRule {
    /// Tag the artists of the playlist's tracks
    Artist {
        threshold: usize,
        exclude_non_latin: bool,
    },
    /// Tag the owner's display name
    Creator,
    /// Tag playlists holding at least one local file
    LocalFiles { tag: String },
    /// Tag playlists flagged as not playable
    Unplayable { tag: String },
    /// Tag the year a description starts with
    Year,
}

impl MassTagRule {
    /// The artist rule with default options
    #[must_use]
    pub const fn artist() -> Self {
        Self::Artist {
            threshold: DEFAULT_ARTIST_THRESHOLD,
            exclude_non_latin: true,
        }
    }

    #[must_use]
    pub fn local_files() -> Self {
        Self::LocalFiles {
            tag: DEFAULT_LOCAL_FILES_TAG.to_string(),
        }
    }

    #[must_use]
    pub fn unplayable() -> Self {
        Self::Unplayable {
            tag: DEFAULT_UNPLAYABLE_TAG.to_string(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Artist { .. } => "artist",
            Self::Creator => "creator",
            Self::LocalFiles { .. } => "local-files",
            Self::Unplayable { .. } => "unplayable",
            Self::Year => "year",
        }
    }

    /// Whether a playlist carrying `tags` is already covered by this rule
    #[must_use]
    pub fn already_applied(&self, tags: &[String]) -> bool {
        match self {
            Self::Artist { .. } => tags.iter().any(|t| t.starts_with(ARTIST_TAG_PREFIX)),
            Self::Creator => tags.iter().any(|t| t.starts_with(CREATOR_TAG_PREFIX)),
            Self::LocalFiles { tag } | Self::Unplayable { tag } => tags.contains(tag),
            Self::Year => tags.iter().any(|t| t.starts_with(YEAR_TAG_PREFIX)),
        }
    }
}

/// The `[by:...]` tag for an owner display name
#[must_use]
pub fn creator_tag(display_name: &str) -> Option<String> {
    let name = display_name.trim();
    if name.is_empty() {
        return None;
    }
    let dashed: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    Some(format!("{CREATOR_TAG_PREFIX}{dashed}]"))
}

/// The `[year:...]` tag for a description opening with four digits
#[must_use]
pub fn year_tag(description: &str) -> Option<String> {
    let year: String = description.chars().take(4).collect();
    (year.chars().count() == 4 && year.chars().all(|c| c.is_ascii_digit()))
        .then(|| format!("{YEAR_TAG_PREFIX}{year}]"))
}

enum Outcome {
    Tagged(Vec<String>),
    AlreadyTagged,
    NoMatch,
}

/// Applies a [`MassTagRule`] across a library tree
#[derive(Clone)]
pub struct MassTagOperator {
    store: TagStore,
    provider: SharedProvider,
}

impl MassTagOperator {
    #[must_use]
    pub fn new(store: TagStore, provider: SharedProvider) -> Self {
        Self { store, provider }
    }

    /// Apply `rule` to the whole library as returned by the provider
    ///
    /// # Errors
    ///
    /// Returns `MassTagError::Provider` if the rootlist cannot be fetched
    /// and `MassTagError::Cancelled` if `cancel` fires.
    pub async fn run_library(
        &self,
        rule: &MassTagRule,
        cancel: &CancellationToken,
    ) -> Result<BulkOpSummary, MassTagError> {
        let root = fetch(cancel, self.provider.rootlist()).await?;
        self.run(&root, rule, cancel).await
    }

    /// Apply `rule` to every playlist below `root`
    ///
    /// In the returned summary `success` counts tagged playlists, `skipped`
    /// those already covered and `skipped_condition` those the rule did not
    /// match.
    ///
    /// # Errors
    ///
    /// Returns `MassTagError::Cancelled` if `cancel` fires before the walk
    /// completes. Tags applied until then are kept.
    pub async fn run(
        &self,
        root: &Node,
        rule: &MassTagRule,
        cancel: &CancellationToken,
    ) -> Result<BulkOpSummary, MassTagError> {
        let mut summary = BulkOpSummary::new();

        for leaf in root.leaves() {
            match self.visit(leaf, rule, cancel).await {
                Ok(Outcome::Tagged(added)) => {
                    info!(id = %leaf.id, tags = ?added, rule = rule.name(), "added mass tags");
                    summary.add_success();
                }
                Ok(Outcome::AlreadyTagged) => summary.add_skip(),
                Ok(Outcome::NoMatch) => summary.add_skip_condition(),
                Err(MassTagError::Cancelled) => {
                    info!(rule = rule.name(), done = summary.total(), "mass tagging cancelled");
                    return Err(MassTagError::Cancelled);
                }
                Err(e) => {
                    warn!(id = %leaf.id, error = %e, rule = rule.name(), "mass tagging failed for playlist");
                    summary.add_error(format!("{}: {e}", leaf.id));
                }
            }
        }

        info!(
            rule = rule.name(),
            tagged = summary.success,
            failed = summary.errors,
            "finished mass tagging"
        );
        Ok(summary)
    }

    async fn visit(
        &self,
        leaf: &Leaf,
        rule: &MassTagRule,
        cancel: &CancellationToken,
    ) -> Result<Outcome, MassTagError> {
        if cancel.is_cancelled() {
            return Err(MassTagError::Cancelled);
        }

        let id = &leaf.id;
        if rule.already_applied(&self.store.tags_of(id)?) {
            debug!(%id, rule = rule.name(), "already tagged");
            return Ok(Outcome::AlreadyTagged);
        }

        let tags = self.derive(id, rule, cancel).await?;
        if tags.is_empty() {
            debug!(%id, rule = rule.name(), "rule did not match");
            return Ok(Outcome::NoMatch);
        }

        let added = self.store.add_tag_list(id, &tags)?;
        Ok(Outcome::Tagged(added))
    }

    async fn derive(
        &self,
        id: &EntityId,
        rule: &MassTagRule,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, MassTagError> {
        let tags = match rule {
            MassTagRule::Artist {
                threshold,
                exclude_non_latin,
            } => {
                let contents = fetch(cancel, self.provider.contents(id)).await?;
                artists::artist_tags(&contents, *threshold, *exclude_non_latin)
            }
            MassTagRule::Creator => {
                let metadata = fetch(cancel, self.provider.metadata(id)).await?;
                metadata
                    .owner
                    .and_then(|owner| creator_tag(&owner.display_name))
                    .into_iter()
                    .collect()
            }
            MassTagRule::LocalFiles { tag } => {
                let contents = fetch(cancel, self.provider.contents(id)).await?;
                if contents.items.iter().any(|track| track.is_local) {
                    vec![tag.clone()]
                } else {
                    Vec::new()
                }
            }
            MassTagRule::Unplayable { tag } => {
                let metadata = fetch(cancel, self.provider.metadata(id)).await?;
                if metadata.can_play {
                    Vec::new()
                } else {
                    vec![tag.clone()]
                }
            }
            MassTagRule::Year => {
                let metadata = fetch(cancel, self.provider.metadata(id)).await?;
                year_tag(&metadata.description).into_iter().collect()
            }
        };
        Ok(tags)
    }
}

/// Await `request` unless `cancel` fires first
async fn fetch<T>(
    cancel: &CancellationToken,
    request: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, MassTagError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(MassTagError::Cancelled),
        result = request => result.map_err(MassTagError::from),
    }
}
