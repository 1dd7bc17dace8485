/// Subcommand execution
use crate::cli::Command;
use crate::config::CadenceConfig;
use cadence_catalog::CatalogService;
use cadence_core::{CatalogStore, Playlist, PlaylistId, Song, SongId, UrlResolver};
use cadence_playback::format_time;
use cadence_resolver::YouTubeResolver;
use cadence_storage::SqliteCatalogStore;
use std::io::Write;
use std::sync::Arc;

/// Wired-up services for one CLI invocation
pub struct App {
    config: CadenceConfig,
    catalog: CatalogService,
}

impl App {
    /// Open the database and build the catalog service
    pub async fn open(config: CadenceConfig) -> anyhow::Result<Self> {
        let store = SqliteCatalogStore::connect(&config.storage.database_url).await?;
        let store: Arc<dyn CatalogStore> = Arc::new(store);
        let resolver: Arc<dyn UrlResolver> =
            Arc::new(YouTubeResolver::new(config.resolver.clone()));

        Ok(Self {
            catalog: CatalogService::new(store, resolver),
            config,
        })
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Run `command`, writing human-readable output to `out`
    pub async fn run(&self, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
        match command {
            Command::Playlists => {
                let playlists = self.catalog.list_playlists().await?;
                if playlists.is_empty() {
                    writeln!(out, "No playlists")?;
                }
                for playlist in &playlists {
                    write_playlist(out, playlist)?;
                }
            }
            Command::Create { name } => {
                let playlist = self.catalog.create_playlist(&name).await?;
                writeln!(out, "Created playlist {} ({})", playlist.name, playlist.id)?;
            }
            Command::Rename { playlist, name } => {
                let id = PlaylistId::new(playlist);
                self.catalog.rename_playlist(&id, &name).await?;
                writeln!(out, "Renamed playlist {id}")?;
            }
            Command::Delete { playlist } => {
                let id = PlaylistId::new(playlist);
                self.catalog.delete_playlist(&id).await?;
                writeln!(out, "Deleted playlist {id}")?;
            }
            Command::Reorder { playlists } => {
                let ids: Vec<PlaylistId> = playlists.into_iter().map(PlaylistId::new).collect();
                self.catalog.reorder_playlists(&ids).await?;
                writeln!(out, "Reordered {} playlists", ids.len())?;
            }
            Command::Songs { playlist } => {
                let playlist = self.catalog.get_playlist(&PlaylistId::new(playlist)).await?;
                writeln!(
                    out,
                    "{} - {} songs, {}",
                    playlist.name,
                    playlist.song_count(),
                    format_time(playlist.total_duration())
                )?;
                for song in &playlist.songs {
                    write_song(out, song)?;
                }
            }
            Command::AddSong {
                playlist,
                url,
                title,
            } => {
                let title = title
                    .or_else(|| self.catalog.resolver().extract_id(&url))
                    .unwrap_or_else(|| url.clone());
                let song = self
                    .catalog
                    .add_song(&PlaylistId::new(playlist), &title, &url)
                    .await?;
                writeln!(out, "Added {} ({})", song.title, song.id)?;
            }
            Command::RemoveSong { song } => {
                let id = SongId::new(song);
                self.catalog.remove_song(&id).await?;
                writeln!(out, "Removed song {id}")?;
            }
            Command::ReorderSongs { playlist, songs } => {
                let ids: Vec<SongId> = songs.into_iter().map(SongId::new).collect();
                self.catalog
                    .reorder_songs(&PlaylistId::new(playlist), &ids)
                    .await?;
                writeln!(out, "Reordered {} songs", ids.len())?;
            }
            Command::Resolve { song } => {
                let song = self.catalog.resolve_song(&SongId::new(song)).await?;
                writeln!(
                    out,
                    "{} -> {}",
                    song.title,
                    song.stream_url.as_deref().unwrap_or_default()
                )?;
            }
            Command::Config => {
                write!(out, "{}", self.config.to_toml()?)?;
            }
        }

        Ok(())
    }
}

fn write_playlist(out: &mut impl Write, playlist: &Playlist) -> std::io::Result<()> {
    writeln!(out, "{:>3}. {}  [{}]", playlist.order + 1, playlist.name, playlist.id)
}

fn write_song(out: &mut impl Write, song: &Song) -> std::io::Result<()> {
    let length = if song.duration > 0.0 {
        format_time(song.duration)
    } else {
        "--:--".to_string()
    };
    let status = if song.is_resolved() {
        "ready"
    } else {
        "processing"
    };
    writeln!(
        out,
        "{:>3}. {}  {}  {}  [{}]",
        song.order + 1,
        song.title,
        length,
        status,
        song.id
    )
}
