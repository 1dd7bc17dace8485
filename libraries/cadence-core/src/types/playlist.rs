use super::{PlaylistId, Song};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, ordered collection of songs
///
/// `order` is the playlist's position in the collection; it is unique across
/// all playlists once a mutation has settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub order: u32,
    /// Populated only when loaded together with songs
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl Playlist {
    /// Create a new, empty playlist at `order`
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            created_at: now,
            modified_at: now,
            order,
            songs: Vec::new(),
        }
    }

    /// Number of loaded songs
    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    /// Sum of known song durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.songs.iter().map(|s| s.duration).sum()
    }
}
