//! Boolean tag queries
//!
//! A query is typed as whitespace-separated terms. A bare term must be
//! present, a `!term` must be absent. Matching folds case on both sides.
//!
//! ```
//! use playlist_tags::db::{Query, SearchMode};
//!
//! let query = Query::parse("rock !live", SearchMode::Any);
//! assert!(query.matches(&["Rock".to_string()]));
//! assert!(!query.matches(&["rock".to_string(), "LIVE".to_string()]));
//! ```

use super::{DbError, EntityId, TagStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How include terms combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Match ANY of the terms (OR logic)
    #[default]
    Any,
    /// Match ALL of the terms (AND logic)
    All,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::All => f.write_str("all"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "or" => Ok(Self::Any),
            "all" | "and" => Ok(Self::All),
            other => Err(format!("unknown search mode '{other}', expected 'any' or 'all'")),
        }
    }
}

/// A parsed filter expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub mode: SearchMode,
}

impl Query {
    /// Parse space-separated terms
    #[must_use]
    pub fn parse(terms: &str, mode: SearchMode) -> Self {
        let mut query = Self {
            mode,
            ..Self::default()
        };

        for term in terms.split_whitespace() {
            let term = term.to_lowercase();
            match term.strip_prefix('!') {
                Some(excluded) if !excluded.is_empty() => query.exclude.push(excluded.to_string()),
                _ => query.include.push(term),
            }
        }

        query
    }

    /// Whether the query has no terms at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Test one playlist's tags against the query
    ///
    /// With no include terms, `All` passes anything not excluded and `Any`
    /// passes nothing.
    #[must_use]
    pub fn matches(&self, tags: &[String]) -> bool {
        let folded: HashSet<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();

        if self.exclude.iter().any(|term| folded.contains(term)) {
            return false;
        }

        match self.mode {
            SearchMode::Any => self.include.iter().any(|term| folded.contains(term)),
            SearchMode::All => self.include.iter().all(|term| folded.contains(term)),
        }
    }
}

impl TagStore {
    /// Indexed playlists passing `query`, in index order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails or a tag set is corrupt.
    pub fn evaluate(&self, query: &Query) -> Result<Vec<EntityId>, DbError> {
        let matched: Vec<EntityId> = self
            .tag_sets()?
            .into_iter()
            .filter(|(_, tags)| query.matches(tags))
            .map(|(id, _)| id)
            .collect();

        tracing::debug!(?query, matched = matched.len(), "evaluated query");
        Ok(matched)
    }

    /// Parse `terms` and evaluate them
    ///
    /// # Errors
    ///
    /// Returns `DbError` if storage fails or a tag set is corrupt.
    pub fn search(&self, terms: &str, mode: SearchMode) -> Result<Vec<EntityId>, DbError> {
        self.evaluate(&Query::parse(terms, mode))
    }
}
