//! In-memory playback queue
//!
//! Holds snapshots of the songs handed to `load_queue`. Later catalog edits
//! do not reach an already loaded queue.

use cadence_core::Song;

/// Ordered tracks plus the current slot
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    tracks: Vec<Song>,
    current_index: Option<usize>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents, selecting `start_index` clamped into range
    pub fn replace(&mut self, tracks: Vec<Song>, start_index: usize) {
        self.current_index = if tracks.is_empty() {
            None
        } else {
            Some(start_index.min(tracks.len() - 1))
        };
        self.tracks = tracks;
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current_index = None;
    }

    pub fn current(&self) -> Option<&Song> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Move to `(i + 1) mod len`
    pub fn advance_wrapping(&mut self) -> Option<&Song> {
        let len = self.tracks.len();
        let index = self.current_index?;
        self.current_index = Some((index + 1) % len);
        self.current()
    }

    /// Move to `i - 1`, wrapping to the last track from index 0
    pub fn retreat_wrapping(&mut self) -> Option<&Song> {
        let len = self.tracks.len();
        let index = self.current_index?;
        self.current_index = Some(if index == 0 { len - 1 } else { index - 1 });
        self.current()
    }

    /// Whether the current slot is the final track
    pub fn is_last(&self) -> bool {
        self.current_index
            .is_some_and(|i| i + 1 == self.tracks.len())
    }

    pub fn tracks(&self) -> &[Song] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
