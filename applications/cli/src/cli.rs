/// Command-line interface definition
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Manage streaming playlists", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ./cadence.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database URL, overriding the configuration
    #[arg(long, global = true, env = "CADENCE_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List playlists in display order
    Playlists,
    /// Create a playlist at the end of the list
    Create {
        /// Playlist name
        name: String,
    },
    /// Rename a playlist
    Rename {
        /// Playlist ID
        playlist: String,
        /// New name
        name: String,
    },
    /// Delete a playlist and its songs
    Delete {
        /// Playlist ID
        playlist: String,
    },
    /// Reorder playlists
    Reorder {
        /// Every playlist ID, in the new order
        #[arg(required = true)]
        playlists: Vec<String>,
    },
    /// List the songs of a playlist
    Songs {
        /// Playlist ID
        playlist: String,
    },
    /// Add a song by its YouTube URL
    AddSong {
        /// Playlist ID
        playlist: String,
        /// YouTube URL (youtube.com/watch?v=..., youtu.be/...)
        url: String,
        /// Song title (default: the video ID)
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Remove a song
    RemoveSong {
        /// Song ID
        song: String,
    },
    /// Reorder the songs of a playlist
    ReorderSongs {
        /// Playlist ID
        playlist: String,
        /// Every song ID of the playlist, in the new order
        #[arg(required = true)]
        songs: Vec<String>,
    },
    /// Resolve the stream URL of a song now
    Resolve {
        /// Song ID
        song: String,
    },
    /// Print the effective configuration
    Config,
}
