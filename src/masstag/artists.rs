//! Artist tag derivation
//!
//! Artist credits are flattened across every track, composite credits are
//! split on `,`, `;` and ` - `, and the distinct names become one
//! `[artist:Name]` tag each. A playlist with more distinct artists than the
//! threshold gets the single aggregate `[artist:VA]` instead.

use crate::provider::PlaylistContents;
use std::collections::HashSet;

/// Prefix of every artist tag
pub const ARTIST_TAG_PREFIX: &str = "[artist:";

/// Aggregate token for compilations and "various artists" credits
pub const VARIOUS_ARTISTS: &str = "VA";

/// Default maximum of distinct artists tagged individually
pub const DEFAULT_ARTIST_THRESHOLD: usize = 5;

const VARIOUS_SPELLINGS: &[&str] = &["Various-Artists", "Various", "V.A.", "V-A", "VA"];

/// Split a composite artist credit into trimmed, non-empty names
pub fn split_artist_names(credit: &str) -> impl Iterator<Item = &str> {
    credit
        .split(" - ")
        .flat_map(|part| part.split([',', ';']))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Whether every character of `name` is Latin, Greek, Cyrillic, Armenian,
/// Hebrew, a letterlike symbol, or one of a few typographic marks
#[must_use]
pub fn is_latin_name(name: &str) -> bool {
    name.chars().all(|c| {
        matches!(c, '\u{0000}'..='\u{05C0}' | '\u{2100}'..='\u{214F}' | '“' | '”' | '’' | '・' | '€')
    })
}

/// Distinct artist names of `contents`, in first-seen order
#[must_use]
pub fn distinct_artists(contents: &PlaylistContents, exclude_non_latin: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    let credits = contents
        .items
        .iter()
        .flat_map(|track| track.artists.iter())
        .flat_map(|artist| split_artist_names(artist.name.trim()));

    for name in credits {
        if exclude_non_latin && !is_latin_name(name) {
            tracing::debug!(artist = name, "skipping non-Latin artist name");
            continue;
        }
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }

    names
}

/// The `[artist:...]` tag for one name
#[must_use]
pub fn artist_tag(name: &str) -> String {
    let dashed: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();

    if VARIOUS_SPELLINGS.contains(&dashed.as_str()) {
        format!("{ARTIST_TAG_PREFIX}{VARIOUS_ARTISTS}]")
    } else {
        format!("{ARTIST_TAG_PREFIX}{dashed}]")
    }
}

/// Artist tags for a playlist
///
/// At most `threshold` distinct artists are tagged individually; past that
/// the playlist gets the single aggregate tag. No artists, no tags.
#[must_use]
pub fn artist_tags(contents: &PlaylistContents, threshold: usize, exclude_non_latin: bool) -> Vec<String> {
    let names = distinct_artists(contents, exclude_non_latin);

    if names.len() > threshold {
        return vec![artist_tag(VARIOUS_ARTISTS)];
    }

    let mut tags: Vec<String> = Vec::with_capacity(names.len());
    for tag in names.iter().map(|name| artist_tag(name)) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
