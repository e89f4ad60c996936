//! Track Normalization
//!
//! Turns a raw media item (file name, URI, duration, optional embedded tags)
//! into a canonical [`Track`].
//!
//! ## Field priority
//!
//! 1. Non-empty platform tag
//! 2. File name fallback parser (artist and title only)
//! 3. Placeholder ([`UNKNOWN_ARTIST`], [`UNKNOWN_ALBUM`]) or absent
//!
//! ## File name parsing
//!
//! ```text
//! "Daft Punk - 03. Harder_Better.mp3"
//!   stem:   "Daft Punk - 03. Harder_Better"
//!   artist: "Daft Punk"
//!   title:  "Harder Better"
//! ```
//!
//! Normalization never fails and never produces a blank title.
//!
//! ## Usage
//!
//! ```
//! use bridge_traits::RawTags;
//! use core_metadata::normalizer::MetadataNormalizer;
//!
//! let normalizer = MetadataNormalizer::new();
//! let tags = RawTags::default().with_album("Demo Album");
//! let track = normalizer.normalize("1", "02 Sample Song.mp3", "demo", 0.0, Some(&tags));
//!
//! assert_eq!(track.title, "Sample Song");
//! assert_eq!(track.artist, "Unknown Artist");
//! assert_eq!(track.album, "Demo Album");
//! ```

use bridge_traits::{RawTags, RawYear};
use core_library::{Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use tracing::trace;

/// Title used when even the literal file name is blank.
pub const UNTITLED: &str = "Untitled";

const ARTIST_SEPARATOR: &str = " - ";

/// Artist and title recovered from a file name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    /// Left side of the first `" - "`, trimmed; `None` when absent or blank
    pub artist: Option<String>,
    /// Cleaned title, never empty
    pub title: String,
}

/// Stateless normalizer producing canonical [`Track`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataNormalizer;

impl MetadataNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Build a [`Track`] from a raw media item.
    ///
    /// `duration_secs` is the duration reported by the media library; zero,
    /// negative, or non-finite values mean unknown.
    pub fn normalize(
        &self,
        id: impl Into<String>,
        raw_file_name: &str,
        raw_uri: &str,
        duration_secs: f64,
        tags: Option<&RawTags>,
    ) -> Track {
        let parsed = parse_file_name(raw_file_name);
        let tags = tags.cloned().unwrap_or_default();

        let title = tag_text(&tags.title).unwrap_or(parsed.title);
        let artist = tag_text(&tags.artist)
            .or(parsed.artist)
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let album = tag_text(&tags.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

        let track = Track {
            id: id.into(),
            title,
            artist,
            album,
            album_artist: tag_text(&tags.album_artist),
            genre: tag_text(&tags.genre),
            year: tags.year.as_ref().and_then(extract_year),
            track_number: tags.track_number.filter(|n| *n > 0),
            disk_number: tags.disk_number.filter(|n| *n > 0),
            uri: raw_uri.to_string(),
            file_name: raw_file_name.to_string(),
            duration_ms: duration_ms(duration_secs),
        };

        trace!(id = %track.id, title = %track.title, "Normalized track");
        track
    }
}

/// Recover artist and title from a file name.
pub fn parse_file_name(file_name: &str) -> ParsedFileName {
    let stem = strip_extension(file_name);

    let (artist, raw_title) = match stem.split_once(ARTIST_SEPARATOR) {
        Some((left, right)) => {
            let artist = left.trim();
            let artist = (!artist.is_empty()).then(|| artist.to_string());
            (artist, right)
        }
        None => (None, stem),
    };

    let mut title = clean_title(strip_track_prefix(raw_title));
    if title.is_empty() {
        title = clean_title(stem);
    }
    if title.is_empty() {
        title = file_name.trim().to_string();
    }
    if title.is_empty() {
        title = UNTITLED.to_string();
    }

    ParsedFileName { artist, title }
}

/// Extract a positive release year.
///
/// Integers are taken as-is when positive. Text yields the first run of four
/// consecutive ASCII digits (`"2019-04-01"` → 2019, `"(c) 1998"` → 1998).
pub fn extract_year(raw: &RawYear) -> Option<u32> {
    match raw {
        RawYear::Number(n) => u32::try_from(*n).ok().filter(|year| *year > 0),
        RawYear::Text(text) => {
            let mut run = 0;
            for (i, b) in text.bytes().enumerate() {
                if b.is_ascii_digit() {
                    run += 1;
                    if run == 4 {
                        return text[i - 3..=i].parse::<u32>().ok().filter(|year| *year > 0);
                    }
                } else {
                    run = 0;
                }
            }
            None
        }
    }
}

/// Underscores become spaces, whitespace runs collapse, ends are trimmed.
pub fn clean_title(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// Drop a leading track number such as `"02 "`, `"7."` or `"12. "`.
fn strip_track_prefix(raw: &str) -> &str {
    let rest = raw.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == raw.len() {
        return raw;
    }
    rest.strip_prefix('.').unwrap_or(rest).trim_start()
}

fn tag_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|text| {
            text.split_whitespace()
                .filter(|word| !word.chars().all(char::is_control))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
}

fn duration_ms(duration_secs: f64) -> Option<u64> {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        Some((duration_secs * 1000.0).floor() as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("song.mp3"), "song");
        assert_eq!(strip_extension("a.b.flac"), "a.b");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".mp3"), "");
    }

    #[test]
    fn test_strip_track_prefix() {
        assert_eq!(strip_track_prefix("02 Sample"), "Sample");
        assert_eq!(strip_track_prefix("7.Intro"), "Intro");
        assert_eq!(strip_track_prefix("12.  Outro"), "Outro");
        assert_eq!(strip_track_prefix("Track 1"), "Track 1");
        assert_eq!(strip_track_prefix("1999"), "");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Harder__Better  Faster "), "Harder Better Faster");
        assert_eq!(clean_title("___"), "");
    }

    #[test]
    fn test_tag_text_trims_and_drops_blank() {
        assert_eq!(tag_text(&Some("  Daft   Punk ".into())), Some("Daft Punk".into()));
        assert_eq!(tag_text(&Some("   ".into())), None);
        assert_eq!(tag_text(&None), None);
    }

    #[test]
    fn test_duration_floor() {
        assert_eq!(duration_ms(212.9999), Some(212_999));
        assert_eq!(duration_ms(1.0), Some(1000));
        assert_eq!(duration_ms(0.0), None);
        assert_eq!(duration_ms(-3.0), None);
        assert_eq!(duration_ms(f64::NAN), None);
    }

    #[test]
    fn test_year_number() {
        assert_eq!(extract_year(&RawYear::Number(2004)), Some(2004));
        assert_eq!(extract_year(&RawYear::Number(0)), None);
        assert_eq!(extract_year(&RawYear::Number(-5)), None);
    }
}
