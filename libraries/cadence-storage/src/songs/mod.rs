use crate::timestamps::{from_millis, to_millis};
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn song_from_row(row: &SqliteRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get::<SongId, _>("id")?,
        playlist_id: row.try_get::<PlaylistId, _>("playlist_id")?,
        title: row.try_get("title")?,
        source_url: row.try_get("source_url")?,
        stream_url: row.try_get("stream_url")?,
        duration: row.try_get("duration_seconds")?,
        added_at: from_millis(row.try_get("added_at")?)?,
        order: row.try_get::<i64, _>("position")? as u32,
    })
}

/// Get a playlist's songs sorted by position
pub async fn get_by_playlist(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT id, playlist_id, title, source_url, stream_url, duration_seconds, position, added_at
        FROM songs
        WHERE playlist_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(playlist_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(song_from_row).collect()
}

/// Get song by ID
pub async fn get_by_id(pool: &SqlitePool, id: &SongId) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT id, playlist_id, title, source_url, stream_url, duration_seconds, position, added_at
        FROM songs
        WHERE id = ?
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(song_from_row).transpose()
}

/// Count songs in a playlist
pub async fn count(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<u32> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE playlist_id = ?")
        .bind(playlist_id.as_str())
        .fetch_one(pool)
        .await?;

    Ok(count as u32)
}

/// Create new song
pub async fn create(pool: &SqlitePool, song: &Song) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (id, playlist_id, title, source_url, stream_url, duration_seconds, position, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(song.id.as_str())
    .bind(song.playlist_id.as_str())
    .bind(&song.title)
    .bind(&song.source_url)
    .bind(&song.stream_url)
    .bind(song.duration)
    .bind(i64::from(song.order))
    .bind(to_millis(song.added_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete song
pub async fn delete(pool: &SqlitePool, id: &SongId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let playlist_id: Option<String> =
        sqlx::query_scalar("SELECT playlist_id FROM songs WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await?;

    let Some(playlist_id) = playlist_id else {
        return Err(CadenceError::not_found("Song", id.as_str()));
    };

    sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    // Renumber the remaining songs to close the gap
    let remaining: Vec<String> =
        sqlx::query_scalar("SELECT id FROM songs WHERE playlist_id = ? ORDER BY position ASC")
            .bind(&playlist_id)
            .fetch_all(&mut *tx)
            .await?;

    for (position, song_id) in remaining.iter().enumerate() {
        sqlx::query("UPDATE songs SET position = ? WHERE id = ?")
            .bind(position as i64)
            .bind(song_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Reorder songs within one playlist
///
/// `ordered_ids[i]` receives position `i`. A song that vanished or belongs to
/// another playlist rolls the whole transaction back.
pub async fn reorder(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    ordered_ids: &[SongId],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (position, id) in ordered_ids.iter().enumerate() {
        let result = sqlx::query("UPDATE songs SET position = ? WHERE id = ? AND playlist_id = ?")
            .bind(position as i64)
            .bind(id.as_str())
            .bind(playlist_id.as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(CadenceError::update(format!(
                "song {id} is no longer in playlist {playlist_id}, reorder aborted"
            )));
        }
    }

    tx.commit().await?;

    Ok(())
}

/// Set (or clear) the resolved stream URL
pub async fn set_stream_url(pool: &SqlitePool, id: &SongId, stream_url: Option<&str>) -> Result<()> {
    let result = sqlx::query("UPDATE songs SET stream_url = ? WHERE id = ?")
        .bind(stream_url)
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found("Song", id.as_str()));
    }

    Ok(())
}

/// Set song duration in seconds
pub async fn set_duration(pool: &SqlitePool, id: &SongId, seconds: f64) -> Result<()> {
    let result = sqlx::query("UPDATE songs SET duration_seconds = ? WHERE id = ?")
        .bind(seconds)
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found("Song", id.as_str()));
    }

    Ok(())
}
