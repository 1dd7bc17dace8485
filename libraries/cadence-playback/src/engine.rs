//! Playback engine
//!
//! Owns the queue and transport state machine. Commands lock the state for
//! short, synchronous sections and release it before awaiting the backend, so
//! volume, rate and seek stay responsive while a load is in flight. Every
//! load, stop and clear bumps a generation counter; a load or seek that
//! completes under an older generation is discarded.

use crate::backend::{MediaBackend, MediaEvent};
use crate::error::{PlaybackError, Result};
use crate::events::{ObserverId, PlaybackEvent, PlaybackObserver};
use crate::queue::PlaybackQueue;
use crate::session::{RouteChangeReason, SessionEvent};
use crate::types::{PlaybackConfig, PlaybackSnapshot, TransportState};
use crate::volume::{clamp_position, clamp_rate, clamp_volume};
use cadence_core::Song;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Queue and transport controller
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct PlaybackEngine {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn MediaBackend>,
    config: PlaybackConfig,
    state: Mutex<EngineState>,
}

/// A load started under the lock, to be completed outside it
struct PendingLoad {
    generation: u64,
    url: String,
}

struct EngineState {
    queue: PlaybackQueue,
    transport: TransportState,
    current_song: Option<Song>,
    current_time: f64,
    duration: f64,
    volume: f32,
    rate: f32,
    error: Option<String>,
    load_generation: u64,
    play_when_ready: bool,
    resume_after_interruption: bool,
    observers: Vec<(ObserverId, Arc<dyn PlaybackObserver>)>,
    next_observer_id: u64,
}

impl EngineState {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.transport,
            current_song: self.current_song.clone(),
            current_index: self
                .current_song
                .as_ref()
                .and(self.queue.current_index()),
            queue_length: self.queue.len(),
            current_time: self.current_time,
            duration: self.duration,
            volume: self.volume,
            playback_rate: self.rate,
            error: self.error.clone(),
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &self.observers {
            observer.on_event(&event, &snapshot);
        }
    }

    fn set_transport(&mut self, state: TransportState) {
        if self.transport == state {
            return;
        }
        tracing::debug!(from = ?self.transport, to = ?state, "transport state changed");
        self.transport = state;
        self.emit(PlaybackEvent::StateChanged { state });
    }

    fn emit_position(&self) {
        self.emit(PlaybackEvent::PositionChanged {
            current_time: self.current_time,
            duration: self.duration,
        });
    }

    /// Point the engine at the current queue slot and mark it loading
    fn begin_load(&mut self, autoplay: bool) -> Result<PendingLoad> {
        self.load_generation += 1;

        let Some(song) = self.queue.current().cloned() else {
            return Err(PlaybackError::QueueEmpty);
        };

        self.current_time = 0.0;
        self.duration = song.duration;
        self.error = None;
        self.play_when_ready = autoplay;
        self.current_song = Some(song.clone());

        self.emit(PlaybackEvent::TrackChanged {
            song_id: Some(song.id.clone()),
            index: self.queue.current_index(),
        });
        self.emit_position();

        match song.stream_url {
            Some(url) => {
                self.set_transport(TransportState::Loading);
                Ok(PendingLoad {
                    generation: self.load_generation,
                    url,
                })
            }
            None => {
                self.fail(format!("\"{}\" has no stream URL yet", song.title));
                Err(PlaybackError::InvalidTrack(song.id))
            }
        }
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "playback failed");
        self.play_when_ready = false;
        self.error = Some(message.clone());
        self.set_transport(TransportState::Failed);
        self.emit(PlaybackEvent::Error { message });
    }

    /// Pause output without touching the interruption flag
    fn pause_output(&mut self, backend: &dyn MediaBackend) {
        match self.transport {
            TransportState::Playing => {
                backend.pause();
                self.set_transport(TransportState::Paused);
            }
            TransportState::Loading => self.play_when_ready = false,
            _ => {}
        }
    }

    fn start_output(&mut self, backend: &dyn MediaBackend) {
        backend.play();
        backend.set_rate(self.rate);
        self.set_transport(TransportState::Playing);
    }

    /// Synchronous half of `stop`; the caller rewinds the backend afterwards
    fn halt(&mut self, backend: &dyn MediaBackend) {
        self.load_generation += 1;
        self.play_when_ready = false;
        self.resume_after_interruption = false;
        backend.pause();

        let had_song = self.current_song.take().is_some();
        self.current_time = 0.0;
        self.duration = 0.0;
        self.error = None;

        if had_song {
            self.emit(PlaybackEvent::TrackChanged {
                song_id: None,
                index: None,
            });
        }
        self.emit_position();
        self.set_transport(TransportState::Idle);
    }
}

impl PlaybackEngine {
    /// Create an engine driving `backend`
    pub fn new(backend: Arc<dyn MediaBackend>, config: PlaybackConfig) -> Self {
        let volume = clamp_volume(config.volume).unwrap_or(1.0);
        let rate = clamp_rate(config.playback_rate).unwrap_or(1.0);
        backend.set_volume(volume);

        let state = EngineState {
            queue: PlaybackQueue::new(),
            transport: TransportState::Idle,
            current_song: None,
            current_time: 0.0,
            duration: 0.0,
            volume,
            rate,
            error: None,
            load_generation: 0,
            play_when_ready: false,
            resume_after_interruption: false,
            observers: Vec::new(),
            next_observer_id: 0,
        };

        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                state: Mutex::new(state),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn backend(&self) -> &dyn MediaBackend {
        self.inner.backend.as_ref()
    }

    /// Await a load begun under the lock and apply its result
    async fn finish_load(&self, pending: PendingLoad) -> Result<()> {
        let result = self.inner.backend.load(&pending.url).await;

        let mut state = self.lock();
        if state.load_generation != pending.generation {
            tracing::debug!(
                generation = pending.generation,
                current = state.load_generation,
                "discarding stale load"
            );
            return Ok(());
        }

        match result {
            Ok(duration) => {
                if duration.is_finite() && duration > 0.0 {
                    state.duration = duration;
                }
                state.emit_position();

                self.backend().set_volume(state.volume);
                if state.play_when_ready {
                    state.play_when_ready = false;
                    state.start_output(self.backend());
                } else {
                    state.set_transport(TransportState::Paused);
                }
                Ok(())
            }
            Err(e) => {
                state.fail(e.to_string());
                Err(PlaybackError::load(&e))
            }
        }
    }

    /// Seek the backend to zero after a stop; failures only matter for logs
    async fn rewind_backend(&self) {
        if let Err(e) = self.inner.backend.seek(0.0).await {
            tracing::warn!(error = %e, "backend rewind after stop failed");
        }
    }

    // ===== Queue =====

    /// Replace the queue and start playing `songs[start_index]`
    ///
    /// `start_index` is clamped into range. An empty list clears the queue.
    pub async fn load_queue(&self, songs: Vec<Song>, start_index: usize) -> Result<()> {
        if songs.is_empty() {
            return self.clear_queue().await;
        }

        let pending = {
            let mut state = self.lock();
            state.queue.replace(songs, start_index);
            state.emit(PlaybackEvent::QueueChanged {
                length: state.queue.len(),
            });
            tracing::debug!(
                length = state.queue.len(),
                index = ?state.queue.current_index(),
                "queue loaded"
            );
            state.begin_load(true)?
        };

        self.finish_load(pending).await
    }

    /// Stop and drop the queue contents
    pub async fn clear_queue(&self) -> Result<()> {
        {
            let mut state = self.lock();
            state.halt(self.backend());
            state.queue.clear();
            state.emit(PlaybackEvent::QueueChanged { length: 0 });
        }
        self.rewind_backend().await;
        Ok(())
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// No-op when already playing or when there is no queue. While loading,
    /// playback starts once the load lands. From `Idle` or `Failed` the
    /// current slot is reloaded.
    pub async fn play(&self) -> Result<()> {
        let pending = {
            let mut state = self.lock();
            if state.queue.is_empty() {
                return Ok(());
            }
            let transport = state.transport;
            match transport {
                TransportState::Playing => return Ok(()),
                TransportState::Paused => {
                    state.start_output(self.backend());
                    return Ok(());
                }
                TransportState::Loading => {
                    state.play_when_ready = true;
                    return Ok(());
                }
                TransportState::Idle | TransportState::Failed => state.begin_load(true)?,
            }
        };

        self.finish_load(pending).await
    }

    /// Pause playback, or cancel the pending autoplay of a load
    pub async fn pause(&self) -> Result<()> {
        let mut state = self.lock();
        state.resume_after_interruption = false;
        state.pause_output(self.backend());
        Ok(())
    }

    /// Pause when playing (or about to), otherwise play
    pub async fn toggle_play_pause(&self) -> Result<()> {
        let playing = {
            let state = self.lock();
            state.transport == TransportState::Playing
                || (state.transport == TransportState::Loading && state.play_when_ready)
        };

        if playing {
            self.pause().await
        } else {
            self.play().await
        }
    }

    /// Stop playback and forget the current song; the queue is kept
    pub async fn stop(&self) -> Result<()> {
        {
            let mut state = self.lock();
            state.halt(self.backend());
        }
        self.rewind_backend().await;
        Ok(())
    }

    /// Advance to the next track, wrapping to the first after the last
    pub async fn play_next(&self) -> Result<()> {
        let pending = {
            let mut state = self.lock();
            if state.queue.advance_wrapping().is_none() {
                return Err(PlaybackError::QueueEmpty);
            }
            state.begin_load(true)?
        };

        self.finish_load(pending).await
    }

    /// Restart the current track if past the restart threshold, otherwise go
    /// back one track (wrapping to the last)
    pub async fn play_previous(&self) -> Result<()> {
        let restart = {
            let state = self.lock();
            if state.queue.is_empty() {
                return Err(PlaybackError::QueueEmpty);
            }
            state.transport != TransportState::Idle
                && state.current_time > self.inner.config.restart_threshold_secs
        };

        if restart {
            return self.seek(0.0).await;
        }

        let pending = {
            let mut state = self.lock();
            if state.queue.retreat_wrapping().is_none() {
                return Err(PlaybackError::QueueEmpty);
            }
            state.begin_load(true)?
        };

        self.finish_load(pending).await
    }

    // ===== Seek =====

    /// Seek to `time` seconds, clamped to `[0, duration]`
    ///
    /// Requires a loaded track. From `Failed` the current slot is reloaded
    /// first. The position is updated once the backend confirms, and only if
    /// no newer load started meanwhile.
    pub async fn seek(&self, time: f64) -> Result<()> {
        let reload = {
            let mut state = self.lock();
            let transport = state.transport;
            match transport {
                TransportState::Idle => return Err(PlaybackError::NoTrackLoaded),
                TransportState::Failed => Some(state.begin_load(false)?),
                _ => None,
            }
        };

        if let Some(pending) = reload {
            self.finish_load(pending).await?;
        }

        let (generation, target) = {
            let state = self.lock();
            if !state.transport.has_track() {
                return Err(PlaybackError::NoTrackLoaded);
            }
            let Some(target) = clamp_position(time, state.duration) else {
                return Ok(());
            };
            (state.load_generation, target)
        };

        self.inner
            .backend
            .seek(target)
            .await
            .map_err(|e| PlaybackError::playback(&e))?;

        let mut state = self.lock();
        if state.load_generation == generation {
            state.current_time = target;
            state.emit_position();
        } else {
            tracing::debug!(target, "discarding seek for a replaced track");
        }

        Ok(())
    }

    /// Skip forward by the configured interval
    pub async fn skip_forward(&self) -> Result<()> {
        self.skip_forward_by(self.inner.config.skip_interval_secs)
            .await
    }

    /// Skip backward by the configured interval
    pub async fn skip_backward(&self) -> Result<()> {
        self.skip_backward_by(self.inner.config.skip_interval_secs)
            .await
    }

    /// Seek `seconds` past the current position
    pub async fn skip_forward_by(&self, seconds: f64) -> Result<()> {
        let current = self.current_time();
        self.seek(current + seconds).await
    }

    /// Seek `seconds` before the current position
    pub async fn skip_backward_by(&self, seconds: f64) -> Result<()> {
        let current = self.current_time();
        self.seek(current - seconds).await
    }

    // ===== Volume & Rate =====

    /// Set volume, clamped to `[0, 1]`; applies in every state
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        let Some(volume) = clamp_volume(volume) else {
            return Ok(());
        };

        let mut state = self.lock();
        state.volume = volume;
        self.backend().set_volume(volume);
        state.emit(PlaybackEvent::VolumeChanged { volume });
        Ok(())
    }

    /// Set playback rate, clamped to `[0.5, 2.0]`
    ///
    /// Reaches the backend immediately only while playing; otherwise it is
    /// applied when playback next starts.
    pub async fn set_playback_rate(&self, rate: f32) -> Result<()> {
        let Some(rate) = clamp_rate(rate) else {
            return Ok(());
        };

        let mut state = self.lock();
        state.rate = rate;
        if state.transport == TransportState::Playing {
            self.backend().set_rate(rate);
        }
        state.emit(PlaybackEvent::RateChanged { rate });
        Ok(())
    }

    // ===== Backend & Session Events =====

    /// Apply an event reported by the media backend
    ///
    /// A natural end of track on the last index stops playback; anywhere
    /// else it behaves like [`play_next`](Self::play_next).
    pub async fn handle_media_event(&self, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::TrackEnded => {
                let pending = {
                    let mut state = self.lock();
                    if state.transport != TransportState::Playing {
                        tracing::debug!(state = ?state.transport, "ignoring track end");
                        return Ok(());
                    }
                    if state.queue.is_last() {
                        tracing::debug!("queue exhausted");
                        state.halt(self.backend());
                        None
                    } else {
                        state.queue.advance_wrapping();
                        Some(state.begin_load(true)?)
                    }
                };

                match pending {
                    Some(pending) => self.finish_load(pending).await,
                    None => {
                        self.rewind_backend().await;
                        Ok(())
                    }
                }
            }
            MediaEvent::PlaybackFailed(message) => {
                // While loading, the failure belongs to the replaced item; a
                // failing load reports through its own result instead.
                let mut state = self.lock();
                if matches!(
                    state.transport,
                    TransportState::Playing | TransportState::Paused
                ) {
                    state.fail(message);
                }
                Ok(())
            }
            MediaEvent::PositionChanged(seconds) => {
                let mut state = self.lock();
                if matches!(
                    state.transport,
                    TransportState::Playing | TransportState::Paused
                ) {
                    if let Some(time) = clamp_position(seconds, state.duration) {
                        state.current_time = time;
                        state.emit_position();
                    }
                }
                Ok(())
            }
        }
    }

    /// Apply an audio session notification from the host
    ///
    /// Interruptions pause; playback resumes afterwards only when the host
    /// allows it and the interruption is what paused it. Losing the output
    /// device pauses.
    pub async fn handle_session_event(&self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::InterruptionBegan => {
                let mut state = self.lock();
                let active = state.transport == TransportState::Playing
                    || (state.transport == TransportState::Loading && state.play_when_ready);
                if active {
                    state.pause_output(self.backend());
                    state.resume_after_interruption = true;
                }
                Ok(())
            }
            SessionEvent::InterruptionEnded { should_resume } => {
                let paused_by_interruption = {
                    let mut state = self.lock();
                    std::mem::take(&mut state.resume_after_interruption)
                };
                if should_resume && paused_by_interruption {
                    self.play().await
                } else {
                    Ok(())
                }
            }
            SessionEvent::RouteChanged(RouteChangeReason::DeviceDisconnected) => {
                self.pause().await
            }
            SessionEvent::RouteChanged(_) => Ok(()),
        }
    }

    /// Forward backend events from `events` into the engine until the
    /// channel closes
    pub fn spawn_event_pump(&self, mut events: mpsc::Receiver<MediaEvent>) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Err(e) = engine.handle_media_event(event).await {
                    tracing::warn!(error = %e, "media event not applied");
                }
            }
            tracing::debug!("media event channel closed");
        })
    }

    // ===== Observers =====

    /// Register an observer for every subsequent event
    pub fn subscribe(&self, observer: Arc<dyn PlaybackObserver>) -> ObserverId {
        let mut state = self.lock();
        let id = ObserverId(state.next_observer_id);
        state.next_observer_id += 1;
        state.observers.push((id, observer));
        id
    }

    /// Remove an observer; returns whether it was registered
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut state = self.lock();
        let before = state.observers.len();
        state.observers.retain(|(observer_id, _)| *observer_id != id);
        state.observers.len() != before
    }

    // ===== State Queries =====

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().snapshot()
    }

    pub fn state(&self) -> TransportState {
        self.lock().transport
    }

    pub fn current_song(&self) -> Option<Song> {
        self.lock().current_song.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.lock().queue.current_index()
    }

    /// Seconds into the current track
    pub fn current_time(&self) -> f64 {
        self.lock().current_time
    }

    pub fn duration(&self) -> f64 {
        self.lock().duration
    }

    pub fn volume(&self) -> f32 {
        self.lock().volume
    }

    pub fn playback_rate(&self) -> f32 {
        self.lock().rate
    }

    /// Copy of the queued songs
    pub fn queue(&self) -> Vec<Song> {
        self.lock().queue.tracks().to_vec()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.inner.config
    }
}
