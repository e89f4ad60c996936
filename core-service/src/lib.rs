//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (player, tag reader,
//! media library) into the shared Rust core. Desktop apps typically enable the
//! `desktop-shims` feature (which depends on `bridge-desktop`); mobile hosts
//! build a [`CoreConfig`] around their native adapters.
//!
//! ```ignore
//! use core_service::CoreService;
//!
//! let service = CoreService::desktop(Some("/home/me/Music".into()))?;
//! let report = service.scan_library().await?;
//! if let Some(track) = report.tracks.first() {
//!     service.playback().load_track(track.clone()).await?;
//!     service.playback().play().await?;
//! }
//! service.dispose().await;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_metadata::{LibraryScanner, MetadataNormalizer, ScanReport};
use core_playback::PlaybackStateStore;
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use tracing::info;

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
mod desktop;
#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use desktop::desktop_config;

/// Primary façade exposed to host applications.
///
/// Owns one [`PlaybackStateStore`], an optional [`LibraryScanner`], and the
/// [`EventBus`] both report to. Construction is explicit; nothing is global.
#[derive(Clone)]
pub struct CoreService {
    events: EventBus,
    playback: Arc<PlaybackStateStore>,
    scanner: Option<Arc<LibraryScanner>>,
    normalizer: MetadataNormalizer,
}

impl CoreService {
    /// Create a new service from a validated configuration.
    pub fn new(config: CoreConfig) -> Self {
        let events = EventBus::new(config.event_buffer_size);

        let playback = PlaybackStateStore::with_event_bus(
            config.player.clone(),
            config.playback,
            events.clone(),
        );

        let scanner = config.media_library.clone().map(|library| {
            let mut scanner =
                LibraryScanner::new(library, config.scan).with_event_bus(events.clone());
            if let Some(reader) = config.tag_reader.clone() {
                scanner = scanner.with_tag_reader(reader);
            }
            Arc::new(scanner)
        });

        info!(
            has_tag_reader = config.tag_reader.is_some(),
            has_media_library = scanner.is_some(),
            "Core service created"
        );

        Self {
            events,
            playback,
            scanner,
            normalizer: MetadataNormalizer::new(),
        }
    }

    /// The playback state store.
    pub fn playback(&self) -> &Arc<PlaybackStateStore> {
        &self.playback
    }

    /// Normalizer for tracks the host builds itself.
    pub fn normalizer(&self) -> MetadataNormalizer {
        self.normalizer
    }

    /// Publisher side of the event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Receive every event emitted from now on.
    pub fn subscribe_events(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Enumerate and normalize device audio.
    ///
    /// # Errors
    ///
    /// [`CoreError::CapabilityMissing`] when no `MediaLibrary` was configured,
    /// or a metadata error when enumeration fails.
    pub async fn scan_library(&self) -> Result<ScanReport> {
        let scanner = self
            .scanner
            .as_ref()
            .ok_or_else(|| CoreError::CapabilityMissing {
                capability: "MediaLibrary".to_string(),
                message: "No media library configured; library scans are unavailable."
                    .to_string(),
            })?;
        Ok(scanner.scan().await?)
    }

    pub fn is_disposed(&self) -> bool {
        self.playback.is_disposed()
    }

    /// Release the bound player session and drop all state listeners.
    pub async fn dispose(&self) {
        self.playback.dispose().await;
        info!("Core service disposed");
    }
}
