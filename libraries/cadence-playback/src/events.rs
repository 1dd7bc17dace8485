//! Events emitted by the playback engine

use crate::types::{PlaybackSnapshot, TransportState};
use cadence_core::SongId;
use serde::{Deserialize, Serialize};

/// Engine state change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged { state: TransportState },

    /// Current track changed (`None` after stop or clear)
    TrackChanged {
        song_id: Option<SongId>,
        index: Option<usize>,
    },

    /// Position or duration changed
    PositionChanged { current_time: f64, duration: f64 },

    VolumeChanged { volume: f32 },

    RateChanged { rate: f32 },

    /// Queue contents replaced or cleared
    QueueChanged { length: usize },

    /// The current track failed to load or play
    Error { message: String },
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Receives engine events
///
/// Called while the engine state is locked, in the order mutations complete.
/// Implementations must be quick and must not call back into the engine.
pub trait PlaybackObserver: Send + Sync {
    fn on_event(&self, event: &PlaybackEvent, snapshot: &PlaybackSnapshot);
}
