use crate::{create_pool, ensure_database_dir, playlists, run_migrations, songs, StorageError};
use async_trait::async_trait;
use cadence_core::{error::Result, storage::CatalogStore, types::*};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Catalog store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and apply migrations
    ///
    /// Missing parent directories of a file database are created first.
    pub async fn connect(database_url: &str) -> std::result::Result<Self, StorageError> {
        ensure_database_dir(database_url).await?;
        let pool = create_pool(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        run_migrations(&pool).await?;

        tracing::info!(url = database_url, "catalog database ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    // Playlists
    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_all(&self.pool).await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn count_playlists(&self) -> Result<u32> {
        playlists::count(&self.pool).await
    }

    async fn insert_playlist(&self, playlist: &Playlist) -> Result<()> {
        playlists::create(&self.pool, playlist).await
    }

    async fn rename_playlist(
        &self,
        id: &PlaylistId,
        name: &str,
        modified_at: DateTime<Utc>,
    ) -> Result<()> {
        playlists::rename(&self.pool, id, name, modified_at).await
    }

    async fn touch_playlist(&self, id: &PlaylistId, modified_at: DateTime<Utc>) -> Result<()> {
        playlists::touch(&self.pool, id, modified_at).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, id).await
    }

    async fn reorder_playlists(&self, ordered_ids: &[PlaylistId]) -> Result<()> {
        playlists::reorder(&self.pool, ordered_ids).await
    }

    // Songs
    async fn list_songs(&self, playlist_id: &PlaylistId) -> Result<Vec<Song>> {
        songs::get_by_playlist(&self.pool, playlist_id).await
    }

    async fn get_song(&self, id: &SongId) -> Result<Option<Song>> {
        songs::get_by_id(&self.pool, id).await
    }

    async fn count_songs(&self, playlist_id: &PlaylistId) -> Result<u32> {
        songs::count(&self.pool, playlist_id).await
    }

    async fn insert_song(&self, song: &Song) -> Result<()> {
        songs::create(&self.pool, song).await
    }

    async fn delete_song(&self, id: &SongId) -> Result<()> {
        songs::delete(&self.pool, id).await
    }

    async fn reorder_songs(&self, playlist_id: &PlaylistId, ordered_ids: &[SongId]) -> Result<()> {
        songs::reorder(&self.pool, playlist_id, ordered_ids).await
    }

    async fn set_stream_url(&self, id: &SongId, stream_url: Option<&str>) -> Result<()> {
        songs::set_stream_url(&self.pool, id, stream_url).await
    }

    async fn set_duration(&self, id: &SongId, seconds: f64) -> Result<()> {
        songs::set_duration(&self.pool, id, seconds).await
    }
}
