//! Error types for playback management

use cadence_core::SongId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// The queued song has no resolved stream URL yet
    #[error("Track {0} has no playable stream URL")]
    InvalidTrack(SongId),

    /// The media backend could not load the track
    #[error("Failed to load track: {0}")]
    Load(String),

    /// The media backend failed while playing or seeking
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Command needs a queue but none is loaded
    #[error("Playback queue is empty")]
    QueueEmpty,

    /// Command needs a loaded track (seek, skip)
    #[error("No track loaded")]
    NoTrackLoaded,
}

/// Failures reported by a media backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The stream could not be opened or decoded
    #[error("{0}")]
    Load(String),

    /// Seeking was rejected
    #[error("seek failed: {0}")]
    Seek(String),
}

impl PlaybackError {
    pub(crate) fn load(err: &MediaError) -> Self {
        Self::Load(err.to_string())
    }

    pub(crate) fn playback(err: &MediaError) -> Self {
        Self::Playback(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
