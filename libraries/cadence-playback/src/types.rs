//! Core types for playback management

use cadence_core::Song;
use serde::{Deserialize, Serialize};

/// Transport state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No track loaded
    Idle,

    /// Backend is preparing the current track
    Loading,

    /// Currently playing
    Playing,

    /// Loaded but not playing (paused mid-track, or loaded without autoplay)
    Paused,

    /// The backend reported an error for the current slot
    Failed,
}

impl TransportState {
    /// Whether a track is loaded or being loaded
    pub fn has_track(self) -> bool {
        matches!(self, Self::Loading | Self::Playing | Self::Paused)
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Initial playback rate (0.5-2.0, default: 1.0)
    #[serde(default = "default_rate")]
    pub playback_rate: f32,

    /// Skip forward/backward interval in seconds (default: 15)
    #[serde(default = "default_skip_interval")]
    pub skip_interval_secs: f64,

    /// Past this position "previous" restarts the track instead (default: 3)
    #[serde(default = "default_restart_threshold")]
    pub restart_threshold_secs: f64,
}

fn default_volume() -> f32 {
    1.0
}

fn default_rate() -> f32 {
    1.0
}

fn default_skip_interval() -> f64 {
    15.0
}

fn default_restart_threshold() -> f64 {
    3.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            playback_rate: default_rate(),
            skip_interval_secs: default_skip_interval(),
            restart_threshold_secs: default_restart_threshold(),
        }
    }
}

/// Point-in-time view of the engine for observers and UIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: TransportState,
    /// Song shown as "now playing"; absent after `stop`
    pub current_song: Option<Song>,
    pub current_index: Option<usize>,
    pub queue_length: usize,
    /// Seconds
    pub current_time: f64,
    /// Seconds, 0 when unknown
    pub duration: f64,
    pub volume: f32,
    pub playback_rate: f32,
    /// Last backend error, cleared by the next load
    pub error: Option<String>,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }
}
