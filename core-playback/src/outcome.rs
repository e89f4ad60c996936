//! Log-and-ignore adapter for command results.
//!
//! ```ignore
//! use core_playback::LogOnError;
//!
//! store.play().await.log_on_error("play");
//! ```

use tracing::{debug, warn};

use crate::error::Result;

/// Consume a command result, logging the failure instead of returning it.
pub trait LogOnError<T> {
    /// Returns the success value, or `None` after logging the error.
    fn log_on_error(self, command: &str) -> Option<T>;
}

impl<T> LogOnError<T> for Result<T> {
    fn log_on_error(self, command: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) if e.is_benign() => {
                debug!(command, error = %e, "Playback command had no effect");
                None
            }
            Err(e) => {
                warn!(command, error = %e, "Playback command failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;

    #[test]
    fn test_log_on_error() {
        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.log_on_error("play"), Some(3));

        let err: Result<()> = Err(PlaybackError::Disposed);
        assert_eq!(err.log_on_error("pause"), None);

        let stale: Result<()> = Err(PlaybackError::Superseded {
            track_id: "1".into(),
        });
        assert_eq!(stale.log_on_error("load_track"), None);
    }
}
