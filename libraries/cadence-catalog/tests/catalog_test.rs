//! Integration tests for the catalog service
//!
//! Runs against a real SQLite file with fake resolvers so background
//! resolution can be observed deterministically.

use async_trait::async_trait;
use cadence_catalog::CatalogService;
use cadence_core::storage::CatalogStore;
use cadence_core::types::*;
use cadence_core::{CadenceError, ResolveError, UrlResolver};
use cadence_storage::SqliteCatalogStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

// ===== Test Helpers =====

enum Outcome {
    Resolve,
    Fail,
    WaitFor(Arc<Notify>),
}

/// Accepts `https://youtu.be/<id>` links and resolves them to `stream://<id>`
struct FakeResolver {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl FakeResolver {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlResolver for FakeResolver {
    fn validate(&self, source_url: &str) -> bool {
        self.extract_id(source_url).is_some()
    }

    fn extract_id(&self, source_url: &str) -> Option<String> {
        source_url
            .strip_prefix("https://youtu.be/")
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
    }

    async fn resolve(&self, source_url: &str) -> Result<String, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = self
            .extract_id(source_url)
            .ok_or_else(|| ResolveError::InvalidUrl(source_url.to_string()))?;

        match &self.outcome {
            Outcome::Resolve => Ok(format!("stream://{id}")),
            Outcome::Fail => Err(ResolveError::Network("offline".to_string())),
            Outcome::WaitFor(gate) => {
                gate.notified().await;
                Ok(format!("stream://{id}"))
            }
        }
    }
}

struct Harness {
    catalog: CatalogService,
    store: Arc<SqliteCatalogStore>,
    resolver: Arc<FakeResolver>,
    _temp_dir: TempDir,
}

async fn harness(outcome: Outcome) -> Harness {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("catalog.db").display());
    let store = Arc::new(
        SqliteCatalogStore::connect(&db_url)
            .await
            .expect("Failed to open test database"),
    );
    let resolver = FakeResolver::new(outcome);
    let catalog = CatalogService::new(store.clone(), resolver.clone());

    Harness {
        catalog,
        store,
        resolver,
        _temp_dir: temp_dir,
    }
}

async fn wait_for_stream_url(store: &SqliteCatalogStore, song_id: &SongId) -> Option<String> {
    for _ in 0..200 {
        let song = store.get_song(song_id).await.unwrap()?;
        if song.stream_url.is_some() {
            return song.stream_url;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

async fn wait_for_calls(resolver: &FakeResolver, expected: usize) {
    for _ in 0..200 {
        if resolver.calls() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("resolver was never called");
}

fn ids<T, I: Clone>(items: &[T], id: impl Fn(&T) -> &I) -> Vec<I> {
    items.iter().map(|item| id(item).clone()).collect()
}

// ===== Playlists =====

#[tokio::test]
async fn create_playlist_appends_at_current_count() {
    let h = harness(Outcome::Resolve).await;

    let first = h.catalog.create_playlist("First").await.unwrap();
    let second = h.catalog.create_playlist("Second").await.unwrap();

    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);

    let listed = h.catalog.list_playlists().await.unwrap();
    assert_eq!(ids(&listed, |p| &p.id), vec![first.id, second.id]);
}

#[tokio::test]
async fn create_playlist_rejects_empty_name() {
    let h = harness(Outcome::Resolve).await;

    let result = h.catalog.create_playlist("").await;
    assert!(matches!(result, Err(CadenceError::Validation(_))));

    let result = h.catalog.create_playlist("   ").await;
    assert!(matches!(result, Err(CadenceError::Validation(_))));

    assert!(h.catalog.list_playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_catalog_lists_nothing() {
    let h = harness(Outcome::Resolve).await;
    assert!(h.catalog.list_playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn rename_playlist() {
    let h = harness(Outcome::Resolve).await;
    let playlist = h.catalog.create_playlist("Old").await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    h.catalog.rename_playlist(&playlist.id, "New").await.unwrap();

    let renamed = h.catalog.get_playlist(&playlist.id).await.unwrap();
    assert_eq!(renamed.name, "New");
    assert!(renamed.modified_at > playlist.modified_at);
}

#[tokio::test]
async fn rename_playlist_errors() {
    let h = harness(Outcome::Resolve).await;
    let playlist = h.catalog.create_playlist("Keep").await.unwrap();

    let empty = h.catalog.rename_playlist(&playlist.id, "").await;
    assert!(matches!(empty, Err(CadenceError::Validation(_))));

    let unknown = h.catalog.rename_playlist(&PlaylistId::generate(), "X").await;
    assert!(matches!(unknown, Err(CadenceError::NotFound { .. })));

    let kept = h.catalog.get_playlist(&playlist.id).await.unwrap();
    assert_eq!(kept.name, "Keep");
}

#[tokio::test]
async fn delete_playlist_cascades_to_songs() {
    let h = harness(Outcome::Resolve).await;
    let playlist = h.catalog.create_playlist("Doomed").await.unwrap();
    let a = h.catalog.add_song(&playlist.id, "A", "https://youtu.be/a").await.unwrap();
    let b = h.catalog.add_song(&playlist.id, "B", "https://youtu.be/b").await.unwrap();

    h.catalog.delete_playlist(&playlist.id).await.unwrap();

    assert!(h.store.get_song(&a.id).await.unwrap().is_none());
    assert!(h.store.get_song(&b.id).await.unwrap().is_none());
    assert!(matches!(
        h.catalog.list_songs(&playlist.id).await,
        Err(CadenceError::NotFound { .. })
    ));
    assert!(matches!(
        h.catalog.remove_song(&a.id).await,
        Err(CadenceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn delete_unknown_playlist_is_not_found() {
    let h = harness(Outcome::Resolve).await;

    let result = h.catalog.delete_playlist(&PlaylistId::generate()).await;

    assert!(matches!(result, Err(CadenceError::NotFound { .. })));
}

#[tokio::test]
async fn reorder_playlists_follows_permutation() {
    let h = harness(Outcome::Resolve).await;
    let a = h.catalog.create_playlist("A").await.unwrap();
    let b = h.catalog.create_playlist("B").await.unwrap();
    let c = h.catalog.create_playlist("C").await.unwrap();

    let desired = vec![b.id.clone(), c.id.clone(), a.id.clone()];
    h.catalog.reorder_playlists(&desired).await.unwrap();

    let listed = h.catalog.list_playlists().await.unwrap();
    assert_eq!(ids(&listed, |p| &p.id), desired);
    assert_eq!(listed.iter().map(|p| p.order).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[tokio::test]
async fn reorder_playlists_rejects_partial_permutation() {
    let h = harness(Outcome::Resolve).await;
    let a = h.catalog.create_playlist("A").await.unwrap();
    let b = h.catalog.create_playlist("B").await.unwrap();

    for bad in [
        vec![b.id.clone()],
        vec![b.id.clone(), b.id.clone()],
        vec![b.id.clone(), PlaylistId::generate()],
    ] {
        let result = h.catalog.reorder_playlists(&bad).await;
        assert!(matches!(result, Err(CadenceError::Validation(_))));
    }

    let listed = h.catalog.list_playlists().await.unwrap();
    assert_eq!(ids(&listed, |p| &p.id), vec![a.id, b.id]);
}

#[tokio::test]
async fn move_playlist_shifts_neighbours() {
    let h = harness(Outcome::Resolve).await;
    let a = h.catalog.create_playlist("A").await.unwrap();
    let b = h.catalog.create_playlist("B").await.unwrap();
    let c = h.catalog.create_playlist("C").await.unwrap();

    h.catalog.move_playlist(2, 0).await.unwrap();

    let listed = h.catalog.list_playlists().await.unwrap();
    assert_eq!(ids(&listed, |p| &p.id), vec![c.id, a.id, b.id]);
}

// ===== Songs =====

#[tokio::test]
async fn add_song_assigns_order_and_defaults() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();

    let first = h.catalog.add_song(&playlist.id, "One", "https://youtu.be/one").await.unwrap();
    let second = h.catalog.add_song(&playlist.id, "Two", "https://youtu.be/two").await.unwrap();

    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);
    assert_eq!(second.duration, 0.0);
    assert_eq!(second.stream_url, None);
    assert_eq!(second.playlist_id, playlist.id);
}

#[tokio::test]
async fn add_song_rejects_invalid_url_before_writing() {
    let h = harness(Outcome::Resolve).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();

    let result = h
        .catalog
        .add_song(&playlist.id, "Bad", "https://example.com/song.mp3")
        .await;

    assert!(matches!(result, Err(CadenceError::Validation(_))));
    assert!(h.catalog.list_songs(&playlist.id).await.unwrap().is_empty());
    assert_eq!(h.resolver.calls(), 0);
}

#[tokio::test]
async fn add_song_to_unknown_playlist_is_not_found() {
    let h = harness(Outcome::Resolve).await;

    let result = h
        .catalog
        .add_song(&PlaylistId::generate(), "Lost", "https://youtu.be/lost")
        .await;

    assert!(matches!(result, Err(CadenceError::NotFound { .. })));
}

#[tokio::test]
async fn background_resolution_stores_stream_url() {
    let h = harness(Outcome::Resolve).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();

    let song = h.catalog.add_song(&playlist.id, "Song", "https://youtu.be/xyz").await.unwrap();

    let stream_url = wait_for_stream_url(&h.store, &song.id).await;
    assert_eq!(stream_url.as_deref(), Some("stream://xyz"));
}

#[tokio::test]
async fn add_song_does_not_wait_for_resolution() {
    let gate = Arc::new(Notify::new());
    let h = harness(Outcome::WaitFor(gate.clone())).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();

    // Returns while the resolver is still parked on the gate
    let song = h.catalog.add_song(&playlist.id, "Slow", "https://youtu.be/slow").await.unwrap();
    wait_for_calls(&h.resolver, 1).await;

    let pending = h.store.get_song(&song.id).await.unwrap().unwrap();
    assert!(!pending.is_resolved());

    gate.notify_one();
    let stream_url = wait_for_stream_url(&h.store, &song.id).await;
    assert_eq!(stream_url.as_deref(), Some("stream://slow"));
}

#[tokio::test]
async fn background_resolution_failure_leaves_song_unresolved() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();

    let song = h.catalog.add_song(&playlist.id, "Broken", "https://youtu.be/broken").await.unwrap();
    wait_for_calls(&h.resolver, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let stored = h.store.get_song(&song.id).await.unwrap().unwrap();
    assert_eq!(stored.stream_url, None);
}

#[tokio::test]
async fn resolve_song_surfaces_errors_on_demand() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    let song = h.catalog.add_song(&playlist.id, "Broken", "https://youtu.be/broken").await.unwrap();

    let result = h.catalog.resolve_song(&song.id).await;

    assert!(matches!(
        result,
        Err(CadenceError::Resolution(ResolveError::Network(_)))
    ));
    assert!(matches!(
        h.catalog.resolve_song(&SongId::generate()).await,
        Err(CadenceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn resolve_song_stores_result() {
    let h = harness(Outcome::Resolve).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    let song = h.catalog.add_song(&playlist.id, "Song", "https://youtu.be/now").await.unwrap();

    let resolved = h.catalog.resolve_song(&song.id).await.unwrap();

    assert_eq!(resolved.stream_url.as_deref(), Some("stream://now"));
    let stored = h.store.get_song(&song.id).await.unwrap().unwrap();
    assert_eq!(stored.stream_url.as_deref(), Some("stream://now"));
}

#[tokio::test]
async fn remove_song_closes_gap() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    let a = h.catalog.add_song(&playlist.id, "A", "https://youtu.be/a").await.unwrap();
    let b = h.catalog.add_song(&playlist.id, "B", "https://youtu.be/b").await.unwrap();
    let c = h.catalog.add_song(&playlist.id, "C", "https://youtu.be/c").await.unwrap();

    h.catalog.remove_song(&a.id).await.unwrap();

    let songs = h.catalog.list_songs(&playlist.id).await.unwrap();
    assert_eq!(ids(&songs, |s| &s.id), vec![b.id, c.id]);
    assert_eq!(songs.iter().map(|s| s.order).collect::<Vec<_>>(), vec![0, 1]);

    let d = h.catalog.add_song(&playlist.id, "D", "https://youtu.be/d").await.unwrap();
    assert_eq!(d.order, 2);
}

#[tokio::test]
async fn remove_unknown_song_is_not_found() {
    let h = harness(Outcome::Resolve).await;

    let result = h.catalog.remove_song(&SongId::generate()).await;

    assert!(matches!(result, Err(CadenceError::NotFound { .. })));
}

#[tokio::test]
async fn reorder_songs_follows_permutation() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    let a = h.catalog.add_song(&playlist.id, "A", "https://youtu.be/a").await.unwrap();
    let b = h.catalog.add_song(&playlist.id, "B", "https://youtu.be/b").await.unwrap();
    let c = h.catalog.add_song(&playlist.id, "C", "https://youtu.be/c").await.unwrap();

    let desired = vec![c.id.clone(), a.id.clone(), b.id.clone()];
    h.catalog.reorder_songs(&playlist.id, &desired).await.unwrap();

    let songs = h.catalog.list_songs(&playlist.id).await.unwrap();
    assert_eq!(ids(&songs, |s| &s.id), desired);
    assert_eq!(songs.iter().map(|s| s.order).collect::<Vec<_>>(), vec![0, 1, 2]);

    let invalid = h.catalog.reorder_songs(&playlist.id, &[a.id.clone()]).await;
    assert!(matches!(invalid, Err(CadenceError::Validation(_))));
}

#[tokio::test]
async fn move_song_within_playlist() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    let a = h.catalog.add_song(&playlist.id, "A", "https://youtu.be/a").await.unwrap();
    let b = h.catalog.add_song(&playlist.id, "B", "https://youtu.be/b").await.unwrap();
    let c = h.catalog.add_song(&playlist.id, "C", "https://youtu.be/c").await.unwrap();

    h.catalog.move_song(&playlist.id, 0, 2).await.unwrap();

    let songs = h.catalog.list_songs(&playlist.id).await.unwrap();
    assert_eq!(ids(&songs, |s| &s.id), vec![b.id, c.id, a.id]);
}

#[tokio::test]
async fn list_songs_is_idempotent() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    for id in ["a", "b", "c"] {
        h.catalog
            .add_song(&playlist.id, id, &format!("https://youtu.be/{id}"))
            .await
            .unwrap();
    }

    let first = h.catalog.list_songs(&playlist.id).await.unwrap();
    let second = h.catalog.list_songs(&playlist.id).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn set_song_duration_validates_and_persists() {
    let h = harness(Outcome::Fail).await;
    let playlist = h.catalog.create_playlist("Mix").await.unwrap();
    let song = h.catalog.add_song(&playlist.id, "A", "https://youtu.be/a").await.unwrap();

    assert!(matches!(
        h.catalog.set_song_duration(&song.id, -1.0).await,
        Err(CadenceError::Validation(_))
    ));
    assert!(matches!(
        h.catalog.set_song_duration(&song.id, f64::NAN).await,
        Err(CadenceError::Validation(_))
    ));

    h.catalog.set_song_duration(&song.id, 183.0).await.unwrap();

    let loaded = h.catalog.get_playlist(&playlist.id).await.unwrap();
    assert_eq!(loaded.songs.len(), 1);
    assert_eq!(loaded.total_duration(), 183.0);
}
