//! Persistence gateway trait

use crate::error::Result;
use crate::types::{Playlist, PlaylistId, Song, SongId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable store for playlists and songs
///
/// The gateway holds no business rules: callers decide `order` values and
/// validate input. It does guarantee three things:
/// - listings come back sorted by `order` ascending
/// - deleting a playlist deletes every song it owns
/// - reorders are applied as a single transaction or not at all
///
/// Mutations addressing an unknown id return [`CadenceError::NotFound`].
///
/// [`CadenceError::NotFound`]: crate::CadenceError::NotFound
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ========================================================================
    // Playlists
    // ========================================================================

    /// All playlists sorted by `order`, without their songs
    async fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// Playlist by ID, without its songs
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Number of stored playlists
    async fn count_playlists(&self) -> Result<u32>;

    /// Insert a new playlist record
    async fn insert_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Change a playlist's name and bump `modified_at`
    async fn rename_playlist(
        &self,
        id: &PlaylistId,
        name: &str,
        modified_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Bump `modified_at` without changing anything else
    async fn touch_playlist(&self, id: &PlaylistId, modified_at: DateTime<Utc>) -> Result<()>;

    /// Delete a playlist and all of its songs, closing the gap in `order`
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()>;

    /// Assign `order = index` for every id, atomically
    ///
    /// Fails with [`CadenceError::Update`](crate::CadenceError::Update) and
    /// changes nothing if any id no longer exists.
    async fn reorder_playlists(&self, ordered_ids: &[PlaylistId]) -> Result<()>;

    // ========================================================================
    // Songs
    // ========================================================================

    /// Songs of one playlist sorted by `order`
    async fn list_songs(&self, playlist_id: &PlaylistId) -> Result<Vec<Song>>;

    /// Song by ID
    async fn get_song(&self, id: &SongId) -> Result<Option<Song>>;

    /// Number of songs in a playlist
    async fn count_songs(&self, playlist_id: &PlaylistId) -> Result<u32>;

    /// Insert a new song record
    async fn insert_song(&self, song: &Song) -> Result<()>;

    /// Delete a song, closing the gap in its playlist's `order`
    async fn delete_song(&self, id: &SongId) -> Result<()>;

    /// Assign `order = index` for every song id within one playlist, atomically
    async fn reorder_songs(&self, playlist_id: &PlaylistId, ordered_ids: &[SongId]) -> Result<()>;

    /// Store (or clear) the resolved stream URL
    async fn set_stream_url(&self, id: &SongId, stream_url: Option<&str>) -> Result<()>;

    /// Store a duration learnt during playback
    async fn set_duration(&self, id: &SongId, seconds: f64) -> Result<()>;

    /// Playlist with its songs populated
    async fn get_playlist_with_songs(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        let Some(mut playlist) = self.get_playlist(id).await? else {
            return Ok(None);
        };
        playlist.songs = self.list_songs(id).await?;
        Ok(Some(playlist))
    }
}
