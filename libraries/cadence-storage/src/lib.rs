//! Cadence Storage
//!
//! `SQLite` persistence gateway for Cadence playlists and songs.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each entity owns its own queries (`playlists`, `songs`)
//! - **Transactional Ordering**: Reorders and gap-closing renumbers run in one transaction
//! - **Cascade**: Deleting a playlist removes its songs (foreign key plus explicit delete)
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::SqliteCatalogStore;
//! use cadence_core::storage::CatalogStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteCatalogStore::connect("sqlite://cadence.db").await?;
//!
//! let playlists = store.list_playlists().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod timestamps;

// Vertical slices
pub mod playlists;
pub mod songs;

pub use context::SqliteCatalogStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before any query.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// File path behind a `SQLite` URL, `None` for in-memory databases
pub fn database_file(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);

    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Create the directory that will hold the database file
///
/// `create_if_missing` only creates the file itself, so a URL such as
/// `sqlite://./data/cadence.db` needs `./data` to exist first.
///
/// # Errors
///
/// Returns an error if the directory cannot be created
pub async fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    let file = database_file(database_url);
    let parent = file
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty());

    if let Some(parent) = parent {
        tokio::fs::create_dir_all(parent).await?;
        tracing::debug!(dir = %parent.display(), "database directory ready");
    }
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://cadence.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, "creating sqlite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("sqlite pool ready");

    Ok(pool)
}
