//! Embedded Tag Reading
//!
//! [`LoftyTagReader`] implements [`TagReader`] for local files using the
//! `lofty` crate. It supports ID3v2, Vorbis Comments, MP4 atoms, and FLAC.
//!
//! ## Overview
//!
//! - Accepts `file://` URIs (percent-encoded) or plain filesystem paths
//! - Reads the primary tag, falling back to the first tag present
//! - Returns partial [`RawTags`]; files without tags yield an empty set
//! - Parsing runs on the blocking pool so async callers are never stalled
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::TagReader;
//! use core_metadata::extractor::LoftyTagReader;
//!
//! let reader = LoftyTagReader::new();
//! let tags = reader.read_tags("file:///music/Daft%20Punk/01.mp3").await?;
//! println!("Album: {:?}", tags.album);
//! ```

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::uri::path_from_uri;
use bridge_traits::{RawTags, RawYear, TagReader};
use core_runtime::logging::strip_path;
use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{MetadataError, Result};

/// Tag reader backed by `lofty`.
#[derive(Debug, Clone, Copy)]
pub struct LoftyTagReader {
    parse_options: ParseOptions,
}

impl LoftyTagReader {
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::new(),
        }
    }

    pub fn with_parse_options(parse_options: ParseOptions) -> Self {
        Self { parse_options }
    }

    /// Read tags from a file on disk.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::FileNotFound`] when the path does not exist
    /// - [`MetadataError::UnsupportedFormat`] when lofty cannot identify the file
    /// - [`MetadataError::ExtractionFailed`] when the container is unreadable
    pub fn read_path(&self, path: &Path) -> Result<RawTags> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;

        let tagged_file = Probe::new(std::io::Cursor::new(&data))
            .options(self.parse_options)
            .guess_file_type()
            .map_err(|e| MetadataError::ExtractionFailed(format!("Failed to probe file: {}", e)))?;

        if tagged_file.file_type().is_none() {
            return Err(MetadataError::UnsupportedFormat(
                strip_path(&path.display().to_string()).to_string(),
            ));
        }

        let tagged_file = tagged_file
            .read()
            .map_err(|e| MetadataError::ExtractionFailed(format!("Failed to parse file: {}", e)))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        match tag {
            Some(tag) => Ok(raw_tags_from(tag)),
            None => {
                debug!(
                    file = strip_path(&path.display().to_string()),
                    "No tags found"
                );
                Ok(RawTags::default())
            }
        }
    }
}

impl Default for LoftyTagReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagReader for LoftyTagReader {
    async fn read_tags(&self, uri: &str) -> BridgeResult<RawTags> {
        let path = path_from_uri(uri)?;
        let reader = *self;

        let result = tokio::task::spawn_blocking(move || reader.read_path(&path))
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("tag read task failed: {}", e)))?;

        result.map_err(|e| {
            warn!(uri = strip_path(uri), error = %e, "Tag read failed");
            into_bridge(e)
        })
    }
}

fn raw_tags_from(tag: &Tag) -> RawTags {
    // Free-form dates ("2019-04-01") survive as text; the numeric accessor
    // only covers plain years.
    let year = tag
        .get_string(&ItemKey::RecordingDate)
        .map(|date| RawYear::Text(date.to_string()))
        .or_else(|| tag.year().map(|y| RawYear::Number(i64::from(y))));

    RawTags {
        title: tag.title().map(|s| s.into_owned()),
        artist: tag.artist().map(|s| s.into_owned()),
        album: tag.album().map(|s| s.into_owned()),
        album_artist: tag.get_string(&ItemKey::AlbumArtist).map(str::to_string),
        genre: tag.genre().map(|s| s.into_owned()),
        year,
        track_number: tag.track(),
        disk_number: tag.disk(),
    }
}

fn into_bridge(err: MetadataError) -> BridgeError {
    match err {
        MetadataError::Bridge(inner) => inner,
        MetadataError::Io(inner) => BridgeError::Io(inner),
        MetadataError::FileNotFound(path) => BridgeError::NotAvailable(path),
        MetadataError::UnsupportedFormat(msg) => BridgeError::Unsupported(msg),
        other => BridgeError::OperationFailed(other.to_string()),
    }
}
