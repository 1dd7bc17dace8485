use super::{PlaylistId, SongId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A track reference inside a playlist
///
/// `source_url` is what the user pasted; `stream_url` is filled in once the
/// resolver has turned it into something playable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    /// Owning playlist, used for lookup only
    pub playlist_id: PlaylistId,
    pub title: String,
    pub source_url: String,
    pub stream_url: Option<String>,
    /// Seconds, 0 until known
    pub duration: f64,
    pub added_at: DateTime<Utc>,
    pub order: u32,
}

impl Song {
    /// Create an unresolved song at `order` within `playlist_id`
    pub fn new(
        playlist_id: PlaylistId,
        title: impl Into<String>,
        source_url: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: SongId::generate(),
            playlist_id,
            title: title.into(),
            source_url: source_url.into(),
            stream_url: None,
            duration: 0.0,
            added_at: Utc::now(),
            order,
        }
    }

    /// Whether a playable stream URL is known
    pub fn is_resolved(&self) -> bool {
        self.stream_url.is_some()
    }
}
