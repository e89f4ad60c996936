//! Library Scan
//!
//! Enumerates device audio through a [`MediaLibrary`], reads embedded tags
//! when a [`TagReader`] is available, and normalizes every asset into a
//! [`Track`].
//!
//! Tag reading is best-effort: each read is bounded by
//! [`ScanSettings::tag_read_timeout`], and a failure or timeout degrades that
//! asset to file-name metadata instead of failing the scan.

use bridge_traits::{MediaAsset, MediaLibrary, RawTags, TagReader};
use core_library::Track;
use core_runtime::config::ScanSettings;
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{MetadataError, Result};
use crate::normalizer::MetadataNormalizer;

/// Outcome of a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Normalized tracks in enumeration order
    pub tracks: Vec<Track>,
    /// Assets whose tags could not be read in time
    pub tag_failures: usize,
}

enum TagRead {
    /// No reader configured
    Skipped,
    Read(RawTags),
    /// Read failed or timed out
    Failed,
}

/// Turns device media into normalized tracks.
pub struct LibraryScanner {
    library: Arc<dyn MediaLibrary>,
    tag_reader: Option<Arc<dyn TagReader>>,
    settings: ScanSettings,
    normalizer: MetadataNormalizer,
    events: Option<EventBus>,
}

impl LibraryScanner {
    pub fn new(library: Arc<dyn MediaLibrary>, settings: ScanSettings) -> Self {
        Self {
            library,
            tag_reader: None,
            settings,
            normalizer: MetadataNormalizer::new(),
            events: None,
        }
    }

    pub fn with_tag_reader(mut self, tag_reader: Arc<dyn TagReader>) -> Self {
        self.tag_reader = Some(tag_reader);
        self
    }

    /// Emit [`LibraryEvent`]s on the given bus.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Enumerate up to `max_assets` items and normalize them.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::LibraryUnavailable`] when enumeration itself
    /// fails. Individual tag failures never fail the scan.
    #[instrument(skip(self), fields(limit = self.settings.max_assets))]
    pub async fn scan(&self) -> Result<ScanReport> {
        let limit = self.settings.max_assets;
        self.emit(LibraryEvent::ScanStarted { limit });

        let assets = match self.library.list_audio_assets(limit).await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "Media enumeration failed");
                self.emit(LibraryEvent::ScanFailed {
                    message: e.to_string(),
                });
                return Err(MetadataError::LibraryUnavailable(e.to_string()));
            }
        };

        debug!(count = assets.len(), "Enumerated media assets");

        let mut report = ScanReport {
            tracks: Vec::with_capacity(assets.len().min(limit)),
            tag_failures: 0,
        };

        for asset in assets.into_iter().take(limit) {
            let tags = match self.read_tags(&asset).await {
                TagRead::Skipped => None,
                TagRead::Read(tags) => Some(tags),
                TagRead::Failed => {
                    report.tag_failures += 1;
                    None
                }
            };

            report.tracks.push(self.normalizer.normalize(
                asset.id.clone(),
                &asset.file_name,
                &asset.uri,
                asset.duration_secs,
                tags.as_ref(),
            ));
        }

        info!(
            tracks = report.tracks.len(),
            tag_failures = report.tag_failures,
            "Library scan completed"
        );
        self.emit(LibraryEvent::ScanCompleted {
            track_count: report.tracks.len(),
            tag_failures: report.tag_failures,
        });

        Ok(report)
    }

    async fn read_tags(&self, asset: &MediaAsset) -> TagRead {
        let Some(reader) = &self.tag_reader else {
            return TagRead::Skipped;
        };

        match tokio::time::timeout(self.settings.tag_read_timeout, reader.read_tags(&asset.uri))
            .await
        {
            Ok(Ok(tags)) => TagRead::Read(tags),
            Ok(Err(e)) => {
                debug!(asset = %asset.id, error = %e, "Tag read failed, using file name");
                TagRead::Failed
            }
            Err(_) => {
                warn!(
                    asset = %asset.id,
                    timeout_ms = self.settings.tag_read_timeout.as_millis() as u64,
                    "Tag read timed out, using file name"
                );
                TagRead::Failed
            }
        }
    }

    fn emit(&self, event: LibraryEvent) {
        if let Some(events) = &self.events {
            // No subscribers is not an error for a scan.
            let _ = events.emit(CoreEvent::Library(event));
        }
    }
}
