//! # Playback Module
//!
//! Observable playback state for the current track.
//!
//! ## Overview
//!
//! This module handles:
//! - Driving an injected [`Player`](bridge_traits::Player) (load, play, pause,
//!   stop, seek, volume)
//! - Applying the player's status reports to a single [`PlaybackState`]
//! - Publishing every change to synchronous listeners
//! - Resolving overlapping loads so exactly one track wins
//!
//! Times are milliseconds throughout; [`units`] converts at the player
//! boundary.

pub mod error;
pub mod outcome;
pub mod state;
pub mod store;
pub mod subscribers;
pub mod units;

pub use error::{PlaybackError, Result};
pub use outcome::LogOnError;
pub use state::{PlaybackPhase, PlaybackState, DEFAULT_VOLUME};
pub use store::PlaybackStateStore;
pub use subscribers::{Listener, Subscription};
