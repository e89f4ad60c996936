//! Domain models for the music library

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};

/// Artist used when neither tags nor the file name name one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album used when no tag provides one.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Normalized metadata record for one playable audio item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Caller-supplied stable identifier
    pub id: String,
    /// Display title, never blank
    pub title: String,
    /// Track artist, [`UNKNOWN_ARTIST`] when unresolved
    pub artist: String,
    /// Album name, [`UNKNOWN_ALBUM`] when unresolved
    pub album: String,
    /// Album artist (for compilations)
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    /// Release year, always positive when present
    pub year: Option<u32>,
    /// Track position on album
    pub track_number: Option<u32>,
    /// Disc number for multi-disc albums
    pub disk_number: Option<u32>,
    /// Playable resource locator
    pub uri: String,
    /// Original source file name
    pub file_name: String,
    /// Duration in milliseconds, unknown until the player reports it
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Returns `true` unless the artist is the [`UNKNOWN_ARTIST`] placeholder.
    pub fn has_known_artist(&self) -> bool {
        self.artist != UNKNOWN_ARTIST
    }

    /// Returns `true` unless the album is the [`UNKNOWN_ALBUM`] placeholder.
    pub fn has_known_album(&self) -> bool {
        self.album != UNKNOWN_ALBUM
    }

    /// Check the invariants normalization guarantees.
    ///
    /// Records built by hand (tests, host-side caches) can be checked with
    /// this before being handed to the player.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| LibraryError::InvalidTrack {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.title.trim().is_empty() {
            return Err(invalid("title cannot be empty"));
        }

        if self.artist.trim().is_empty() {
            return Err(invalid("artist cannot be empty"));
        }

        if self.album.trim().is_empty() {
            return Err(invalid("album cannot be empty"));
        }

        if self.year == Some(0) {
            return Err(invalid("year must be positive"));
        }

        if self.track_number == Some(0) {
            return Err(invalid("track number must be positive"));
        }

        if self.disk_number == Some(0) {
            return Err(invalid("disk number must be positive"));
        }

        Ok(())
    }
}
