use cadence_core::{
    error::Result, storage::CatalogStore, types::*, CadenceError, UrlResolver,
};
use chrono::Utc;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Playlist and song orchestration
///
/// Validates input, assigns `order` values, and enriches new songs with a
/// resolved stream URL in the background. Cheap to clone; clones share the
/// same store, resolver and write lock.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    resolver: Arc<dyn UrlResolver>,
    /// Serializes count-then-insert and validate-then-reorder sequences
    writes: Arc<Mutex<()>>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, resolver: Arc<dyn UrlResolver>) -> Self {
        Self {
            store,
            resolver,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn resolver(&self) -> &Arc<dyn UrlResolver> {
        &self.resolver
    }

    // ===== Playlists =====

    /// All playlists sorted by `order`
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        self.store.list_playlists().await.map_err(storage_failure)
    }

    /// One playlist with its songs
    pub async fn get_playlist(&self, id: &PlaylistId) -> Result<Playlist> {
        self.store
            .get_playlist_with_songs(id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| CadenceError::not_found("Playlist", id.as_str()))
    }

    /// Create a playlist at the end of the collection
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let name = validate_name(name)?;

        let _guard = self.writes.lock().await;
        let order = self.store.count_playlists().await.map_err(storage_failure)?;
        let playlist = Playlist::new(name, order);
        self.store
            .insert_playlist(&playlist)
            .await
            .map_err(storage_failure)?;

        tracing::info!(playlist_id = %playlist.id, name = %playlist.name, "created playlist");
        Ok(playlist)
    }

    pub async fn rename_playlist(&self, id: &PlaylistId, new_name: &str) -> Result<()> {
        let name = validate_name(new_name)?;

        self.store
            .rename_playlist(id, name, Utc::now())
            .await
            .map_err(storage_failure)?;

        tracing::info!(playlist_id = %id, name, "renamed playlist");
        Ok(())
    }

    /// Delete a playlist together with all of its songs
    pub async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        let _guard = self.writes.lock().await;
        self.store.delete_playlist(id).await.map_err(storage_failure)?;

        tracing::info!(playlist_id = %id, "deleted playlist");
        Ok(())
    }

    /// Reassign playlist order from a full permutation of the existing ids
    pub async fn reorder_playlists(&self, ordered_ids: &[PlaylistId]) -> Result<()> {
        let _guard = self.writes.lock().await;

        let existing: Vec<PlaylistId> = self
            .store
            .list_playlists()
            .await
            .map_err(storage_failure)?
            .into_iter()
            .map(|p| p.id)
            .collect();
        validate_permutation("playlist", &existing, ordered_ids)?;

        self.store
            .reorder_playlists(ordered_ids)
            .await
            .map_err(storage_failure)?;

        tracing::debug!(count = ordered_ids.len(), "reordered playlists");
        Ok(())
    }

    /// Move the playlist at `from` so it ends up at `to`
    pub async fn move_playlist(&self, from: usize, to: usize) -> Result<()> {
        let mut ids: Vec<PlaylistId> = self
            .list_playlists()
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        move_item(&mut ids, from, to)?;
        self.reorder_playlists(&ids).await
    }

    // ===== Songs =====

    /// Songs of a playlist sorted by `order`
    pub async fn list_songs(&self, playlist_id: &PlaylistId) -> Result<Vec<Song>> {
        self.require_playlist(playlist_id).await?;
        self.store
            .list_songs(playlist_id)
            .await
            .map_err(storage_failure)
    }

    /// Append a song to a playlist
    ///
    /// The source URL is validated before anything is written. Resolution of
    /// the stream URL starts after the insert and does not delay the return.
    pub async fn add_song(
        &self,
        playlist_id: &PlaylistId,
        title: &str,
        source_url: &str,
    ) -> Result<Song> {
        let source_url = source_url.trim();
        if !self.resolver.validate(source_url) {
            return Err(CadenceError::validation(format!(
                "Invalid source URL: {source_url}"
            )));
        }

        let song = {
            let _guard = self.writes.lock().await;
            self.require_playlist(playlist_id).await?;

            let order = self
                .store
                .count_songs(playlist_id)
                .await
                .map_err(storage_failure)?;
            let song = Song::new(playlist_id.clone(), title, source_url, order);
            self.store.insert_song(&song).await.map_err(storage_failure)?;
            self.touch(playlist_id).await;
            song
        };

        tracing::info!(song_id = %song.id, playlist_id = %playlist_id, "added song");

        self.spawn_resolution(&song);
        Ok(song)
    }

    pub async fn remove_song(&self, song_id: &SongId) -> Result<()> {
        let _guard = self.writes.lock().await;
        let song = self.require_song(song_id).await?;

        self.store.delete_song(song_id).await.map_err(storage_failure)?;
        self.touch(&song.playlist_id).await;

        tracing::info!(song_id = %song_id, "removed song");
        Ok(())
    }

    /// Reassign song order within one playlist from a full permutation
    pub async fn reorder_songs(
        &self,
        playlist_id: &PlaylistId,
        ordered_ids: &[SongId],
    ) -> Result<()> {
        let _guard = self.writes.lock().await;
        self.require_playlist(playlist_id).await?;

        let existing: Vec<SongId> = self
            .store
            .list_songs(playlist_id)
            .await
            .map_err(storage_failure)?
            .into_iter()
            .map(|s| s.id)
            .collect();
        validate_permutation("song", &existing, ordered_ids)?;

        self.store
            .reorder_songs(playlist_id, ordered_ids)
            .await
            .map_err(storage_failure)?;
        self.touch(playlist_id).await;

        tracing::debug!(playlist_id = %playlist_id, count = ordered_ids.len(), "reordered songs");
        Ok(())
    }

    /// Move the song at `from` so it ends up at `to` within its playlist
    pub async fn move_song(&self, playlist_id: &PlaylistId, from: usize, to: usize) -> Result<()> {
        let mut ids: Vec<SongId> = self
            .list_songs(playlist_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        move_item(&mut ids, from, to)?;
        self.reorder_songs(playlist_id, &ids).await
    }

    /// Resolve a song's stream URL now and wait for the result
    ///
    /// Unlike the background path, failures are returned to the caller.
    pub async fn resolve_song(&self, song_id: &SongId) -> Result<Song> {
        let mut song = self.require_song(song_id).await?;

        let stream_url = self.resolver.resolve(&song.source_url).await?;
        self.store
            .set_stream_url(song_id, Some(&stream_url))
            .await
            .map_err(storage_failure)?;

        tracing::info!(song_id = %song_id, "resolved song");
        song.stream_url = Some(stream_url);
        Ok(song)
    }

    /// Record a duration learnt during playback
    pub async fn set_song_duration(&self, song_id: &SongId, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CadenceError::validation(format!(
                "Invalid duration: {seconds}"
            )));
        }

        self.store
            .set_duration(song_id, seconds)
            .await
            .map_err(storage_failure)
    }

    // ===== Internal =====

    async fn require_playlist(&self, id: &PlaylistId) -> Result<Playlist> {
        self.store
            .get_playlist(id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| CadenceError::not_found("Playlist", id.as_str()))
    }

    async fn require_song(&self, id: &SongId) -> Result<Song> {
        self.store
            .get_song(id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| CadenceError::not_found("Song", id.as_str()))
    }

    /// Bump `modified_at`; the song change already committed, so failures only log
    async fn touch(&self, playlist_id: &PlaylistId) {
        if let Err(e) = self.store.touch_playlist(playlist_id, Utc::now()).await {
            tracing::warn!(playlist_id = %playlist_id, error = %e, "failed to update playlist timestamp");
        }
    }

    fn spawn_resolution(&self, song: &Song) {
        let store = Arc::clone(&self.store);
        let resolver = Arc::clone(&self.resolver);
        let song_id = song.id.clone();
        let source_url = song.source_url.clone();

        tokio::spawn(async move {
            match resolver.resolve(&source_url).await {
                Ok(stream_url) => {
                    match store.set_stream_url(&song_id, Some(&stream_url)).await {
                        Ok(()) => tracing::debug!(song_id = %song_id, "stored resolved stream url"),
                        Err(e) => tracing::warn!(
                            song_id = %song_id,
                            error = %e,
                            "could not store resolved stream url"
                        ),
                    }
                }
                Err(e) => tracing::warn!(
                    song_id = %song_id,
                    source_url = %source_url,
                    error = %e,
                    "background resolution failed, song stays unresolved"
                ),
            }
        });
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CadenceError::validation("Playlist name cannot be empty"));
    }
    Ok(trimmed)
}

/// Raw database failures surface as storage errors; domain errors pass through
fn storage_failure(err: CadenceError) -> CadenceError {
    match err {
        CadenceError::Database(msg) => CadenceError::Storage(msg),
        other => other,
    }
}

/// `ordered` must contain every id of `existing` exactly once
fn validate_permutation<T>(entity: &str, existing: &[T], ordered: &[T]) -> Result<()>
where
    T: Eq + Hash + std::fmt::Display,
{
    if existing.len() != ordered.len() {
        return Err(CadenceError::validation(format!(
            "Expected {} {entity} ids, got {}",
            existing.len(),
            ordered.len()
        )));
    }

    let known: HashSet<&T> = existing.iter().collect();
    let mut seen = HashSet::with_capacity(ordered.len());
    for id in ordered {
        if !known.contains(id) {
            return Err(CadenceError::validation(format!("Unknown {entity} id: {id}")));
        }
        if !seen.insert(id) {
            return Err(CadenceError::validation(format!("Duplicate {entity} id: {id}")));
        }
    }

    Ok(())
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    if from >= items.len() || to >= items.len() {
        return Err(CadenceError::validation(format!(
            "Move {from} -> {to} out of range for {} items",
            items.len()
        )));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}
