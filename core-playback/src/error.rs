//! # Playback Error Types
//!
//! Errors returned by [`PlaybackStateStore`](crate::PlaybackStateStore)
//! commands.

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The player could not bind the track's resource. The store is left
    /// without a current track.
    #[error("Failed to load track {track_id}: {source}")]
    LoadFailed {
        track_id: String,
        #[source]
        source: BridgeError,
    },

    /// A transport command was rejected by the player. State is unchanged.
    #[error("Player rejected {command}: {source}")]
    CommandFailed {
        command: &'static str,
        #[source]
        source: BridgeError,
    },

    /// A newer `load_track` call started before this one finished binding.
    #[error("Load of track {track_id} was superseded by a newer load")]
    Superseded { track_id: String },

    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f32),

    /// The store was disposed; it accepts no further commands.
    #[error("Playback store has been disposed")]
    Disposed,
}

impl PlaybackError {
    /// Returns `true` for outcomes that are part of normal operation rather
    /// than player faults.
    pub fn is_benign(&self) -> bool {
        matches!(self, PlaybackError::Superseded { .. })
    }

    /// Name of the transport command that failed, if any.
    pub fn command(&self) -> Option<&'static str> {
        match self {
            PlaybackError::CommandFailed { command, .. } => Some(*command),
            PlaybackError::LoadFailed { .. } | PlaybackError::Superseded { .. } => {
                Some("load_track")
            }
            PlaybackError::InvalidVolume(_) => Some("set_volume"),
            PlaybackError::Disposed => None,
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
