//! Device media enumeration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default cap on a single enumeration batch. Pagination beyond the cap is not
/// supported.
pub const DEFAULT_MEDIA_BATCH_LIMIT: usize = 1000;

/// Audio asset as reported by the host media store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Host-stable asset identifier.
    pub id: String,
    /// Original file name including extension.
    pub file_name: String,
    /// Playable resource locator.
    pub uri: String,
    /// Duration in seconds (`0.0` when the host does not know it).
    pub duration_secs: f64,
    /// Album grouping key, when the host provides one.
    pub album_id: Option<String>,
}

/// Enumerates audio assets available on the device.
#[async_trait::async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Return at most `limit` audio assets.
    async fn list_audio_assets(&self, limit: usize) -> Result<Vec<MediaAsset>>;
}
