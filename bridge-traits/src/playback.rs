//! Player capability trait and supporting transport types.
//!
//! The host owns audio decoding and output. The core drives it through the
//! narrow [`Player`] contract below: bind a resource, issue transport commands
//! against the returned handle, and listen for pushed [`PlayerStatus`] reports.
//!
//! All time values crossing this boundary are expressed in **seconds** (`f64`),
//! matching what native audio engines report. The core converts to
//! milliseconds on its side of the boundary.

use crate::error::Result;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque identifier for a player resource bound by [`Player::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerHandle(Uuid);

impl PlayerHandle {
    /// Generate a new handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a handle from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status report pushed by a player, either at a fixed cadence while playing
/// or on every native playback event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerStatus {
    /// Whether audio is currently audible.
    pub playing: bool,
    /// Current playback position in seconds.
    pub current_time_secs: f64,
    /// Total duration in seconds (`0.0` while unknown).
    pub duration_secs: f64,
}

impl PlayerStatus {
    pub fn new(playing: bool, current_time_secs: f64, duration_secs: f64) -> Self {
        Self {
            playing,
            current_time_secs,
            duration_secs,
        }
    }
}

/// Sending half of a status channel, held by the player implementation.
pub type StatusSender = mpsc::UnboundedSender<PlayerStatus>;

/// Receiving half of a status channel, handed to the core on bind.
pub type StatusReceiver = mpsc::UnboundedReceiver<PlayerStatus>;

/// Create a status channel pair for a freshly bound resource.
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    mpsc::unbounded_channel()
}

/// A player resource bound to one URI.
///
/// The receiver yields status reports until the resource is released, at
/// which point the player drops its sender and the stream ends.
#[derive(Debug)]
pub struct BoundPlayer {
    pub handle: PlayerHandle,
    pub status: StatusReceiver,
}

impl BoundPlayer {
    pub fn new(handle: PlayerHandle, status: StatusReceiver) -> Self {
        Self { handle, status }
    }
}

/// Audio transport provided by the host platform.
///
/// Implementations must be safe to share across tasks. Every method may fail
/// with a [`BridgeError`](crate::error::BridgeError); the core decides how to
/// surface it.
#[async_trait::async_trait]
pub trait Player: Send + Sync {
    /// Bind a new player resource to `uri` in a paused state.
    async fn bind(&self, uri: &str) -> Result<BoundPlayer>;

    /// Release the resource and stop its status stream. Releasing an unknown
    /// handle should succeed silently.
    async fn release(&self, handle: PlayerHandle) -> Result<()>;

    /// Begin or resume playback.
    async fn play(&self, handle: PlayerHandle) -> Result<()>;

    /// Pause playback without releasing the resource.
    async fn pause(&self, handle: PlayerHandle) -> Result<()>;

    /// Seek to an absolute position in seconds. Out-of-range values are the
    /// implementation's to clamp or reject.
    async fn seek_to(&self, handle: PlayerHandle, seconds: f64) -> Result<()>;

    /// Set output volume, normalized to `0.0..=1.0`.
    async fn set_volume(&self, handle: PlayerHandle, volume: f32) -> Result<()>;
}
