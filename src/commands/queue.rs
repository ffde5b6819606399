//! Queue and playlists commands - resolve a query through the caches

use super::Result;
use crate::cache::CacheLayer;
use crate::db::{SearchMode, TagStore};
use crate::output;
use crate::sort::{self, PlaylistSort};

/// Execute the queue command - print every track URI of the matching playlists
///
/// # Errors
/// Returns an error if the query cannot be evaluated or contents cannot be read
pub async fn queue(
    store: &TagStore,
    cache: &CacheLayer,
    terms: &[String],
    mode: SearchMode,
    shuffle: bool,
    quiet: bool,
) -> Result<()> {
    let ids = store.search(&terms.join(" "), mode)?;
    let mut uris = cache.track_uris(&ids).await?;
    if shuffle {
        sort::shuffle(&mut uris);
    }

    if !quiet {
        eprintln!("Queueing {} track(s) from {} playlist(s)", uris.len(), ids.len());
    }
    for uri in uris {
        println!("{uri}");
    }
    Ok(())
}

/// Execute the playlists command - print titles of the matching playlists
///
/// Playlists whose metadata cannot be fetched are skipped with a warning.
///
/// # Errors
/// Returns an error if the query cannot be evaluated
pub async fn playlists(
    store: &TagStore,
    cache: &CacheLayer,
    terms: &[String],
    mode: SearchMode,
    order: PlaylistSort,
    quiet: bool,
) -> Result<()> {
    let ids = store.search(&terms.join(" "), mode)?;
    let mut found = Vec::with_capacity(ids.len());
    for (id, result) in ids.iter().zip(cache.metadata_many(&ids).await) {
        match result {
            Ok(metadata) => found.push(metadata),
            Err(e) => tracing::warn!(%id, error = %e, "skipping playlist without metadata"),
        }
    }

    sort::sort_playlists(&mut found, order);
    for metadata in &found {
        println!("{}", output::playlist_title(metadata, quiet));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheSettings;
    use crate::db::EntityId;
    use crate::testing::{FakeProvider, TestStore, contents, track};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_queue_fetches_contents_once() {
        let test = TestStore::new();
        test.store().add_tags(&EntityId::from("a"), "rock").unwrap();
        let provider = Arc::new(FakeProvider::new().with_contents("a", contents(vec![track("t1", &["X"])])));
        let cache = CacheLayer::new(test.shared_storage(), provider.clone(), CacheSettings::default());

        queue(test.store(), &cache, &["rock".to_string()], SearchMode::Any, false, true)
            .await
            .unwrap();
        queue(test.store(), &cache, &["rock".to_string()], SearchMode::Any, true, true)
            .await
            .unwrap();

        assert_eq!(provider.contents_calls(), 1);
    }
}
