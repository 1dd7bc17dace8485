//! Media backend abstraction
//!
//! The engine drives an opaque backend through these primitives and learns
//! about completion and failures through [`MediaEvent`]s.

use crate::error::MediaError;
use async_trait::async_trait;

/// Events a backend reports asynchronously
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The current item played to its end
    TrackEnded,

    /// The current item failed after loading
    PlaybackFailed(String),

    /// Periodic position update, in seconds
    PositionChanged(f64),
}

/// Transport primitives of a media backend
///
/// Implementations must not call back into the engine from these methods;
/// report progress through [`MediaEvent`]s instead.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Replace the current item with `url` and wait until it is ready
    ///
    /// Returns the duration in seconds, or 0 when unknown.
    async fn load(&self, url: &str) -> Result<f64, MediaError>;

    /// Start or resume output of the loaded item
    fn play(&self);

    /// Pause output, keeping the position
    fn pause(&self);

    /// Move to `seconds` and wait for the backend to confirm
    async fn seek(&self, seconds: f64) -> Result<(), MediaError>;

    /// Set output volume (0.0-1.0)
    fn set_volume(&self, volume: f32);

    /// Set playback rate (0.5-2.0)
    fn set_rate(&self, rate: f32);
}
