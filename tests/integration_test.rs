//! Integration tests for playlist-tags
//!
//! These tests open real sled databases in temporary directories and drive
//! complete workflows through the public library API.

use playlist_tags::{
    cache::{CacheLayer, CacheNamespace, CacheSettings},
    codec,
    db::{EntityId, SearchMode, TagStore},
    masstag::{MassTagOperator, MassTagRule},
    provider::{PlaylistProvider, SnapshotProvider},
    storage::{MemoryStorage, SharedStorage, SledStorage, StorageBackend},
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const LIBRARY: &str = r#"{
    "rootlist": {"items": [
        {"type": "playlist", "uri": "spotify:playlist:road", "name": "Road Trip"},
        {"type": "folder", "uri": "spotify:user:me:folder:moods", "name": "Moods", "items": [
            {"type": "playlist", "uri": "spotify:playlist:calm", "name": "Calm"},
            {"type": "playlist", "uri": "spotify:playlist:mixed", "name": "Mixed"}
        ]}
    ]},
    "playlists": {
        "road": {
            "metadata": {
                "uri": "spotify:playlist:road",
                "name": "Road Trip",
                "description": "1999 summer drives",
                "owner": {"uri": "spotify:user:me", "username": "me", "displayName": "Sam Doe"}
            },
            "contents": {"items": [
                {"uri": "spotify:track:t1", "name": "One", "artists": [{"name": "The Band"}]},
                {"uri": "spotify:track:t2", "name": "Two", "artists": [{"name": "The Band"}]}
            ]}
        },
        "calm": {
            "metadata": {"uri": "spotify:playlist:calm", "name": "Calm", "canPlay": false},
            "contents": {"items": [
                {"uri": "spotify:local:Artist:Album:Song:180", "name": "Song", "isLocal": true}
            ]}
        },
        "mixed": {
            "metadata": {"uri": "spotify:playlist:mixed", "name": "Mixed"},
            "contents": {"items": [
                {"uri": "spotify:track:m1", "artists": [{"name": "A"}]},
                {"uri": "spotify:track:m2", "artists": [{"name": "B"}]},
                {"uri": "spotify:track:m3", "artists": [{"name": "C"}]}
            ]}
        }
    }
}"#;

/// Helper function to open a sled-backed store in a fresh temporary directory
fn setup_sled_store() -> (TagStore, SharedStorage, TempDir) {
    let dir = TempDir::new().unwrap();
    let storage: SharedStorage = Arc::new(SledStorage::open(dir.path().join("db"), None).unwrap());
    (TagStore::new(storage.clone()), storage, dir)
}

fn library() -> Arc<SnapshotProvider> {
    Arc::new(SnapshotProvider::from_json(LIBRARY).unwrap())
}

fn id(s: &str) -> EntityId {
    EntityId::from(s)
}

#[test]
fn test_tag_and_search_on_disk() {
    let (store, _storage, _dir) = setup_sled_store();

    store.add_tags(&id("road"), "Rock summer").unwrap();
    store.add_tags(&id("calm"), "chill summer").unwrap();
    store.add_tags(&id("mixed"), "rock").unwrap();

    assert_eq!(
        store.search("summer !rock", SearchMode::All).unwrap(),
        vec![id("calm")]
    );
    assert_eq!(
        store.search("rock chill", SearchMode::Any).unwrap(),
        vec![id("road"), id("calm"), id("mixed")]
    );
    assert_eq!(store.tags_of(&id("road")).unwrap(), vec!["Rock", "summer"]);
}

#[test]
fn test_tags_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");

    {
        let storage = Arc::new(SledStorage::open(&path, None).unwrap());
        TagStore::new(storage).add_tags(&id("road"), "rock").unwrap();
    }

    let storage = Arc::new(SledStorage::open(&path, None).unwrap());
    let store = TagStore::new(storage);
    assert_eq!(store.tagged_ids().unwrap(), vec![id("road")]);
    assert_eq!(store.tags_of(&id("road")).unwrap(), vec!["rock"]);
}

#[test]
fn test_remove_matching_deregisters_emptied_playlists() {
    let (store, _storage, _dir) = setup_sled_store();
    store.add_tags(&id("road"), "[artist:X] rock").unwrap();
    store.add_tags(&id("calm"), "[artist:Y]").unwrap();

    let summary = store.remove_matching_pattern(r"^\[artist:", 0).unwrap();

    assert_eq!(summary.tags_removed, 2);
    assert_eq!(summary.entities_cleared, 1);
    assert_eq!(store.tagged_ids().unwrap(), vec![id("road")]);
    assert!(!store.contains(&id("calm")).unwrap());
}

#[test]
fn test_export_import_into_fresh_store() {
    let (source, _storage, _dir) = setup_sled_store();
    source.add_tags(&id("road"), "rock summer").unwrap();
    source.add_tags(&id("calm"), "chill [contains-local-files]").unwrap();

    let text = codec::export(&source, None).unwrap();
    let target = TagStore::new(Arc::new(MemoryStorage::new()));
    let report = codec::import(&target, &text).unwrap();

    assert!(!report.halted);
    assert_eq!(report.skipped, 0);
    assert_eq!(codec::export(&target, None).unwrap(), text);

    let filtered = codec::export(&source, Some("[contains-local-files]")).unwrap();
    assert!(filtered.contains("tags:road === "));
    assert!(!filtered.contains("tags:calm === "));
}

#[test]
fn test_import_stops_at_quota() {
    let source = TagStore::new(Arc::new(MemoryStorage::new()));
    for n in 0..20 {
        source.add_tags(&id(&format!("p{n:02}")), "some-rather-long-tag another-tag").unwrap();
    }
    let text = codec::export(&source, None).unwrap();

    let target = TagStore::new(Arc::new(MemoryStorage::with_quota(200)));
    let report = codec::import(&target, &text).unwrap();

    assert!(report.halted);
    assert!(report.applied < report.attempted);
}

#[tokio::test]
async fn test_cache_serves_second_read_from_storage() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let cache = CacheLayer::new(storage.clone(), library(), CacheSettings::default());

    let fetched = cache.metadata(&id("road")).await.unwrap();
    assert_eq!(fetched.name, "Road Trip");
    assert!(storage.get("tags:cache:metadata:road").unwrap().is_some());

    let cached = cache.metadata(&id("road")).await.unwrap();
    assert_eq!(cached.uri, "spotify:playlist:road");
    assert_eq!(cached.description, "1999 summer drives");

    assert_eq!(cache.clear(CacheNamespace::Metadata).unwrap(), 1);
    assert!(storage.get("tags:cache:metadata:road").unwrap().is_none());
}

#[tokio::test]
async fn test_cache_track_uris_keeps_local_files() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let cache = CacheLayer::new(storage, library(), CacheSettings::default());

    let first = cache.track_uris(&[id("road"), id("calm")]).await.unwrap();
    let second = cache.track_uris(&[id("road"), id("calm")]).await.unwrap();

    assert_eq!(
        first,
        vec![
            "spotify:track:t1",
            "spotify:track:t2",
            "spotify:local:Artist:Album:Song:180"
        ]
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_unknown_playlist_is_error() {
    let cache = CacheLayer::new(Arc::new(MemoryStorage::new()), library(), CacheSettings::disabled());
    assert!(cache.metadata(&id("missing")).await.is_err());
}

#[tokio::test]
async fn test_mass_tag_library() {
    let (store, _storage, _dir) = setup_sled_store();
    let operator = MassTagOperator::new(store.clone(), library());
    let cancel = CancellationToken::new();

    let artists = operator
        .run_library(
            &MassTagRule::Artist {
                threshold: 2,
                exclude_non_latin: true,
            },
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(artists.success, 2);
    assert_eq!(artists.skipped_condition, 1);
    assert_eq!(store.tags_of(&id("road")).unwrap(), vec!["[artist:The-Band]"]);
    assert_eq!(store.tags_of(&id("mixed")).unwrap(), vec!["[artist:VA]"]);

    let local = operator.run_library(&MassTagRule::local_files(), &cancel).await.unwrap();
    assert_eq!(local.success, 1);
    assert!(store.tags_of(&id("calm")).unwrap().contains(&"[contains-local-files]".to_string()));

    operator.run_library(&MassTagRule::Year, &cancel).await.unwrap();
    operator.run_library(&MassTagRule::Creator, &cancel).await.unwrap();
    operator.run_library(&MassTagRule::unplayable(), &cancel).await.unwrap();
    assert_eq!(
        store.tags_of(&id("road")).unwrap(),
        vec!["[artist:The-Band]", "[year:1999]", "[by:Sam-Doe]"]
    );
    assert!(store.tags_of(&id("calm")).unwrap().contains(&"[unplayable]".to_string()));

    let again = operator.run_library(&MassTagRule::Year, &cancel).await.unwrap();
    assert_eq!(again.skipped, 1);
}

#[tokio::test]
async fn test_mass_tag_cancelled_before_start() {
    let (store, _storage, _dir) = setup_sled_store();
    let operator = MassTagOperator::new(store.clone(), library());
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(operator.run_library(&MassTagRule::Year, &cancel).await.is_err());
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_tag_folder_members() {
    let (store, _storage, _dir) = setup_sled_store();
    let provider = library();

    let root = provider.rootlist().await.unwrap();
    let folder = root.find_folder("moods").unwrap();
    let summary = store.add_tags_to_many(&folder.entity_ids(), "mood");

    assert_eq!(summary.success, 2);
    assert_eq!(store.search("mood", SearchMode::Any).unwrap(), vec![id("calm"), id("mixed")]);
}
