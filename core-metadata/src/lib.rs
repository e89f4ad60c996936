//! # Metadata Module
//!
//! Turns raw media items into canonical library tracks.
//!
//! ## Overview
//!
//! This module handles:
//! - Track normalization with a deterministic fallback chain
//!   (platform tags, then file name parsing, then placeholders)
//! - Display strings for list rows and the now-playing view
//! - Embedded tag reading (ID3, Vorbis, MP4, FLAC) via `lofty`
//! - Device library scans that combine the above

pub mod display;
pub mod error;
pub mod extractor;
pub mod normalizer;
pub mod scanner;

pub use display::{describe, format_duration, TrackDescription};
pub use error::{MetadataError, Result};
pub use extractor::LoftyTagReader;
pub use normalizer::{extract_year, parse_file_name, MetadataNormalizer, ParsedFileName};
pub use scanner::{LibraryScanner, ScanReport};
