use crate::timestamps::{from_millis, to_millis};
use cadence_core::{error::Result, types::*, CadenceError};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get::<PlaylistId, _>("id")?,
        name: row.try_get("name")?,
        created_at: from_millis(row.try_get("created_at")?)?,
        modified_at: from_millis(row.try_get("modified_at")?)?,
        order: row.try_get::<i64, _>("position")? as u32,
        songs: Vec::new(),
    })
}

/// Get all playlists sorted by position
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, position, created_at, modified_at
        FROM playlists
        ORDER BY position ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(playlist_from_row).collect()
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, position, created_at, modified_at
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Count playlists
pub async fn count(pool: &SqlitePool) -> Result<u32> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists")
        .fetch_one(pool)
        .await?;

    Ok(count as u32)
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: &Playlist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlists (id, name, position, created_at, modified_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(playlist.id.as_str())
    .bind(&playlist.name)
    .bind(i64::from(playlist.order))
    .bind(to_millis(playlist.created_at))
    .bind(to_millis(playlist.modified_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Rename playlist
pub async fn rename(
    pool: &SqlitePool,
    id: &PlaylistId,
    name: &str,
    modified_at: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET name = ?, modified_at = ? WHERE id = ?")
        .bind(name)
        .bind(to_millis(modified_at))
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found("Playlist", id.as_str()));
    }

    Ok(())
}

/// Update playlist modified_at
pub async fn touch(pool: &SqlitePool, id: &PlaylistId, modified_at: DateTime<Utc>) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET modified_at = ? WHERE id = ?")
        .bind(to_millis(modified_at))
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found("Playlist", id.as_str()));
    }

    Ok(())
}

/// Delete playlist and its songs
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;

    // Explicit cascade; the foreign key covers the same rows when enabled
    sqlx::query("DELETE FROM songs WHERE playlist_id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(CadenceError::not_found("Playlist", id.as_str()));
    }

    // Close the gap left by the deleted playlist
    let remaining: Vec<String> =
        sqlx::query_scalar("SELECT id FROM playlists ORDER BY position ASC")
            .fetch_all(&mut *tx)
            .await?;

    for (position, playlist_id) in remaining.iter().enumerate() {
        sqlx::query("UPDATE playlists SET position = ? WHERE id = ?")
            .bind(position as i64)
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Reorder playlists
///
/// `ordered_ids[i]` receives position `i`. Any id that no longer exists rolls
/// the whole transaction back.
pub async fn reorder(pool: &SqlitePool, ordered_ids: &[PlaylistId]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (position, id) in ordered_ids.iter().enumerate() {
        let result = sqlx::query("UPDATE playlists SET position = ? WHERE id = ?")
            .bind(position as i64)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(CadenceError::update(format!(
                "playlist {id} no longer exists, reorder aborted"
            )));
        }
    }

    tx.commit().await?;

    Ok(())
}
