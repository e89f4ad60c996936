//! # Library Domain Models
//!
//! Immutable records shared by the metadata and playback crates.
//!
//! A [`Track`](models::Track) is produced once by metadata normalization and
//! then handed around by value; nothing in the core mutates a track after it
//! has been built.

pub mod error;
pub mod models;

pub use error::{LibraryError, Result};
pub use models::{Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
