//! Playback state snapshot.

use core_library::Track;
use serde::{Deserialize, Serialize};

/// Volume of a freshly created store.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Coarse position in the playback state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// No track loaded
    Empty,
    /// A load is in flight
    Loading,
    Paused,
    Playing,
}

/// Immutable snapshot handed to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,
    /// True only between a load's start and its outcome
    pub is_loading: bool,
    pub current_track: Option<Track>,
    /// Playback position in milliseconds
    pub position_ms: u64,
    /// Track duration in milliseconds, 0 while unknown
    pub duration_ms: u64,
    /// Output volume in `0.0..=1.0`
    pub volume: f32,
}

impl PlaybackState {
    /// Default state carrying the given volume.
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (&self.current_track, self.is_loading, self.is_playing) {
            (_, true, _) => PlaybackPhase::Loading,
            (None, false, _) => PlaybackPhase::Empty,
            (Some(_), false, true) => PlaybackPhase::Playing,
            (Some(_), false, false) => PlaybackPhase::Paused,
        }
    }

    /// Id of the loaded track, if any.
    pub fn track_id(&self) -> Option<&str> {
        self.current_track.as_ref().map(|t| t.id.as_str())
    }

    /// Clear the track and transport fields, keeping the volume.
    pub(crate) fn reset(&mut self) {
        *self = Self::with_volume(self.volume);
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_loading: false,
            current_track: None,
            position_ms: 0,
            duration_ms: 0,
            volume: DEFAULT_VOLUME,
        }
    }
}
