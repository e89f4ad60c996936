//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `DirectoryMediaLibrary` enumerates audio files under a folder with `walkdir`
//! - `SimulatedPlayer` drives playback from the tokio clock without audio output
//! - `RodioPlayer` renders audio through `rodio` (feature `rodio-output`)
//!
//! Tag reading for local files lives in `core_metadata::LoftyTagReader`.
//!
//! ## Feature Flags
//!
//! - `rodio-output`: Enable real audio output through the default device
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DirectoryMediaLibrary, SimulatedPlayer};
//! use std::sync::Arc;
//!
//! let player = Arc::new(SimulatedPlayer::default());
//! let library = Arc::new(DirectoryMediaLibrary::new("/home/me/Music"));
//! ```

mod media;
mod simulated;

#[cfg(feature = "rodio-output")]
mod playback;

pub use media::{DirectoryMediaLibrary, AUDIO_EXTENSIONS};
pub use simulated::{SimulatedPlayer, DEFAULT_SIMULATED_DURATION};

#[cfg(feature = "rodio-output")]
pub use playback::RodioPlayer;
