//! Cadence - Playback Engine
//!
//! Queue and transport state machine for streaming playback.
//!
//! This crate provides:
//! - A playback queue of song snapshots with wrap-around navigation
//! - Transport states (idle, loading, playing, paused, failed)
//! - Seek, skip, volume and playback rate with clamping
//! - Stale-load protection through a load generation counter
//! - Observers and a "now playing" remote control bridge
//! - Audio session handling (interruptions, route changes)
//!
//! # Architecture
//!
//! The engine knows nothing about audio decoding. It drives a
//! [`MediaBackend`] and receives [`MediaEvent`]s back, usually through
//! [`PlaybackEngine::spawn_event_pump`].
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_playback::{MediaBackend, PlaybackConfig, PlaybackEngine};
//! use std::sync::Arc;
//!
//! # async fn example(backend: Arc<dyn MediaBackend>, songs: Vec<cadence_core::Song>)
//! # -> cadence_playback::Result<()> {
//! let engine = PlaybackEngine::new(backend, PlaybackConfig::default());
//!
//! engine.load_queue(songs, 0).await?;
//! engine.skip_forward().await?;
//! engine.play_next().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod engine;
pub mod error;
pub mod events;
pub mod queue;
pub mod remote;
pub mod session;
pub mod time_format;
pub mod types;
pub mod volume;

pub use backend::{MediaBackend, MediaEvent};
pub use engine::PlaybackEngine;
pub use error::{MediaError, PlaybackError, Result};
pub use events::{ObserverId, PlaybackEvent, PlaybackObserver};
pub use queue::PlaybackQueue;
pub use remote::{NowPlayingInfo, NowPlayingSurface, RemoteCommand, RemoteControlBridge};
pub use session::{RouteChangeReason, SessionEvent};
pub use time_format::{format_time, format_time_short};
pub use types::{PlaybackConfig, PlaybackSnapshot, TransportState};
