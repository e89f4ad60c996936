//! # Host Bridge Traits
//!
//! Capability traits that every host platform implements for the playback
//! core.
//!
//! ## Overview
//!
//! The core never touches audio hardware, tag parsers, or the device media
//! store directly. Each of those is a capability the host injects:
//!
//! - [`Player`](playback::Player) - Audio transport: bind a URI, play, pause,
//!   seek, set volume, and push [`PlayerStatus`](playback::PlayerStatus) reports
//! - [`TagReader`](tags::TagReader) - Best-effort embedded metadata
//! - [`MediaLibrary`](media::MediaLibrary) - Device audio enumeration
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Player |
//! |----------|----------------------|--------|
//! | Desktop  | `bridge-desktop`     | `RodioPlayer`, `SimulatedPlayer` |
//! | Mobile   | host app (FFI)       | native media player |
//!
//! A `Player` is mandatory; the core fails fast with
//! `core_runtime::Error::CapabilityMissing` when none is supplied. Tag reading
//! and media enumeration are optional.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with an actionable message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single adapter can be shared
//! across async tasks behind an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::playback::{status_channel, BoundPlayer, Player, PlayerHandle};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct NativePlayer { /* platform handle */ }
//!
//! #[async_trait]
//! impl Player for NativePlayer {
//!     async fn bind(&self, uri: &str) -> Result<BoundPlayer> {
//!         let (tx, rx) = status_channel();
//!         // hand `tx` to the native status callback
//!         Ok(BoundPlayer::new(PlayerHandle::new(), rx))
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod logging;
pub mod media;
pub mod playback;
pub mod tags;
pub mod uri;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaAsset, MediaLibrary, DEFAULT_MEDIA_BATCH_LIMIT};
pub use playback::{
    status_channel, BoundPlayer, Player, PlayerHandle, PlayerStatus, StatusReceiver,
    StatusSender,
};
pub use tags::{RawTags, RawYear, TagReader};
