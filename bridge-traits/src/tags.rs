//! Tag-reading capability.
//!
//! Hosts expose whatever embedded metadata their platform can read. Every
//! field is optional and a reader may legitimately return an empty
//! [`RawTags`]; the core fills the gaps from the file name.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Year as reported by a tag source: either an integer frame or free text
/// such as `"2024-05-01"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawYear {
    Number(i64),
    Text(String),
}

impl From<i64> for RawYear {
    fn from(value: i64) -> Self {
        RawYear::Number(value)
    }
}

impl From<&str> for RawYear {
    fn from(value: &str) -> Self {
        RawYear::Text(value.to_string())
    }
}

impl From<String> for RawYear {
    fn from(value: String) -> Self {
        RawYear::Text(value)
    }
}

/// Best-effort partial tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<RawYear>,
    pub track_number: Option<u32>,
    pub disk_number: Option<u32>,
}

impl RawTags {
    /// Returns `true` if no field carries a value.
    pub fn is_empty(&self) -> bool {
        *self == RawTags::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_album_artist(mut self, album_artist: impl Into<String>) -> Self {
        self.album_artist = Some(album_artist.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<RawYear>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_track_number(mut self, track_number: u32) -> Self {
        self.track_number = Some(track_number);
        self
    }

    pub fn with_disk_number(mut self, disk_number: u32) -> Self {
        self.disk_number = Some(disk_number);
        self
    }
}

/// Reads embedded metadata for a resource.
///
/// Implementations must not block indefinitely; callers additionally bound
/// every call with their own timeout.
#[async_trait::async_trait]
pub trait TagReader: Send + Sync {
    async fn read_tags(&self, uri: &str) -> Result<RawTags>;
}
