//! "Now playing" mirror and remote command dispatch
//!
//! [`RemoteControlBridge`] keeps an OS-level now-playing surface in sync with
//! the engine and maps inbound remote commands onto engine commands.

use crate::engine::PlaybackEngine;
use crate::error::Result;
use crate::events::{ObserverId, PlaybackEvent, PlaybackObserver};
use crate::types::PlaybackSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the now-playing surface shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    pub title: String,
    /// Seconds
    pub current_time: f64,
    /// Seconds
    pub duration: f64,
    pub is_playing: bool,
    /// Effective rate: the configured rate while playing, 0 otherwise
    pub playback_rate: f32,
}

impl NowPlayingInfo {
    /// Build from a snapshot; `None` when nothing is current
    pub fn from_snapshot(snapshot: &PlaybackSnapshot) -> Option<Self> {
        let song = snapshot.current_song.as_ref()?;
        let is_playing = snapshot.is_playing();
        Some(Self {
            title: song.title.clone(),
            current_time: snapshot.current_time,
            duration: snapshot.duration,
            is_playing,
            playback_rate: if is_playing {
                snapshot.playback_rate
            } else {
                0.0
            },
        })
    }
}

/// Platform now-playing integration
pub trait NowPlayingSurface: Send + Sync {
    fn publish(&self, info: &NowPlayingInfo);

    /// Remove any now-playing entry
    fn clear(&self);
}

/// Commands received from headsets, lock screens and similar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RemoteCommand {
    Play,
    Pause,
    Toggle,
    SkipForward,
    SkipBackward,
    /// Seek to an absolute position in seconds
    SeekTo(f64),
    Next,
    Previous,
}

struct NowPlayingPublisher {
    surface: Arc<dyn NowPlayingSurface>,
}

impl NowPlayingPublisher {
    fn refresh(&self, snapshot: &PlaybackSnapshot) {
        match NowPlayingInfo::from_snapshot(snapshot) {
            Some(info) => self.surface.publish(&info),
            None => self.surface.clear(),
        }
    }
}

impl PlaybackObserver for NowPlayingPublisher {
    fn on_event(&self, _event: &PlaybackEvent, snapshot: &PlaybackSnapshot) {
        self.refresh(snapshot);
    }
}

/// Two-way link between the engine and a now-playing surface
///
/// Dropping the bridge unsubscribes it and clears the surface.
pub struct RemoteControlBridge {
    engine: PlaybackEngine,
    surface: Arc<dyn NowPlayingSurface>,
    observer_id: ObserverId,
}

impl RemoteControlBridge {
    /// Subscribe `surface` to `engine` and publish the current state
    pub fn attach(engine: PlaybackEngine, surface: Arc<dyn NowPlayingSurface>) -> Self {
        let publisher = Arc::new(NowPlayingPublisher {
            surface: Arc::clone(&surface),
        });
        publisher.refresh(&engine.snapshot());
        let observer_id = engine.subscribe(publisher);

        Self {
            engine,
            surface,
            observer_id,
        }
    }

    /// Dispatch a remote command onto the matching engine command
    pub async fn handle(&self, command: RemoteCommand) -> Result<()> {
        tracing::debug!(?command, "remote command");
        match command {
            RemoteCommand::Play => self.engine.play().await,
            RemoteCommand::Pause => self.engine.pause().await,
            RemoteCommand::Toggle => self.engine.toggle_play_pause().await,
            RemoteCommand::SkipForward => self.engine.skip_forward().await,
            RemoteCommand::SkipBackward => self.engine.skip_backward().await,
            RemoteCommand::SeekTo(seconds) => self.engine.seek(seconds).await,
            RemoteCommand::Next => self.engine.play_next().await,
            RemoteCommand::Previous => self.engine.play_previous().await,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }
}

impl Drop for RemoteControlBridge {
    fn drop(&mut self) {
        self.engine.unsubscribe(self.observer_id);
        self.surface.clear();
    }
}
