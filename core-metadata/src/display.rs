//! Display strings for list rows and the now-playing view.

use core_library::Track;
use serde::Serialize;

/// Joins the secondary line parts.
pub const METADATA_SEPARATOR: &str = " • ";

/// Secondary line when a track has nothing beyond its title.
pub const NO_METADATA: &str = "No metadata available";

/// Two-line presentation of a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackDescription {
    /// The track title
    pub primary: String,
    /// Artist, album, year and genre, skipping placeholders and gaps
    pub secondary: String,
}

/// Build the display lines for a track.
///
/// Placeholder artist and album values are left out of the secondary line.
/// The result depends only on the track, so calling it twice yields the same
/// description.
pub fn describe(track: &Track) -> TrackDescription {
    let mut parts: Vec<String> = Vec::new();

    if track.has_known_artist() {
        parts.push(track.artist.clone());
    }
    if track.has_known_album() {
        parts.push(track.album.clone());
    }
    if let Some(year) = track.year {
        parts.push(year.to_string());
    }
    if let Some(genre) = track.genre.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        parts.push(genre.to_string());
    }

    let secondary = if parts.is_empty() {
        NO_METADATA.to_string()
    } else {
        parts.join(METADATA_SEPARATOR)
    };

    TrackDescription {
        primary: track.title.clone(),
        secondary,
    }
}

/// Format a millisecond position as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
