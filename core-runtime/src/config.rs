//! # Core Configuration Module
//!
//! Builder-based configuration for the playback core.
//!
//! ## Overview
//!
//! [`CoreConfig`] carries the host capabilities the core drives plus the
//! tunables for playback and library scanning. The builder validates
//! everything up front so misconfiguration fails at startup, not at the first
//! play command.
//!
//! ## Required Dependencies
//!
//! - `Player` - audio transport; there is no sensible fallback
//!
//! ## Optional Dependencies
//!
//! - `TagReader` - embedded metadata; without it titles come from file names
//! - `MediaLibrary` - device enumeration; without it library scans are unavailable
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .player(Arc::new(MyPlayer::new()))
//!     .tag_reader(Arc::new(MyTagReader))
//!     .initial_volume(0.8)
//!     .tag_read_timeout(Duration::from_secs(1))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No player: fails with an actionable CapabilityMissing error
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing player");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{MediaLibrary, Player, TagReader, DEFAULT_MEDIA_BATCH_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default cadence at which desktop players push status while playing.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(500);

/// Default upper bound on a single tag read during a library scan.
pub const DEFAULT_TAG_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Playback tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Volume the store starts with, in `0.0..=1.0`.
    pub initial_volume: f32,
    /// Status push cadence requested from players that poll.
    pub status_interval: Duration,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            status_interval: DEFAULT_STATUS_INTERVAL,
        }
    }
}

/// Library scan tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Maximum number of assets requested from the media library.
    pub max_assets: usize,
    /// Per-asset bound on tag reading.
    pub tag_read_timeout: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_assets: DEFAULT_MEDIA_BATCH_LIMIT,
            tag_read_timeout: DEFAULT_TAG_READ_TIMEOUT,
        }
    }
}

/// Core configuration. Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Audio transport (required)
    pub player: Arc<dyn Player>,

    /// Embedded metadata reader (optional)
    pub tag_reader: Option<Arc<dyn TagReader>>,

    /// Device media enumeration (optional)
    pub media_library: Option<Arc<dyn MediaLibrary>>,

    pub playback: PlaybackSettings,

    pub scan: ScanSettings,

    /// Per-subscriber buffer of the event bus
    pub event_buffer_size: usize,
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("player", &"Player { ... }")
            .field(
                "tag_reader",
                &self.tag_reader.as_ref().map(|_| "TagReader { ... }"),
            )
            .field(
                "media_library",
                &self.media_library.as_ref().map(|_| "MediaLibrary { ... }"),
            )
            .field("playback", &self.playback)
            .field("scan", &self.scan)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Builder for [`CoreConfig`].
pub struct CoreConfigBuilder {
    player: Option<Arc<dyn Player>>,
    tag_reader: Option<Arc<dyn TagReader>>,
    media_library: Option<Arc<dyn MediaLibrary>>,
    playback: PlaybackSettings,
    scan: ScanSettings,
    event_buffer_size: usize,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self {
            player: None,
            tag_reader: None,
            media_library: None,
            playback: PlaybackSettings::default(),
            scan: ScanSettings::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl CoreConfigBuilder {
    pub fn player(mut self, player: Arc<dyn Player>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn tag_reader(mut self, tag_reader: Arc<dyn TagReader>) -> Self {
        self.tag_reader = Some(tag_reader);
        self
    }

    pub fn media_library(mut self, media_library: Arc<dyn MediaLibrary>) -> Self {
        self.media_library = Some(media_library);
        self
    }

    pub fn playback_settings(mut self, settings: PlaybackSettings) -> Self {
        self.playback = settings;
        self
    }

    pub fn initial_volume(mut self, volume: f32) -> Self {
        self.playback.initial_volume = volume;
        self
    }

    pub fn status_interval(mut self, interval: Duration) -> Self {
        self.playback.status_interval = interval;
        self
    }

    pub fn scan_settings(mut self, settings: ScanSettings) -> Self {
        self.scan = settings;
        self
    }

    pub fn max_assets(mut self, max_assets: usize) -> Self {
        self.scan.max_assets = max_assets;
        self
    }

    pub fn tag_read_timeout(mut self, timeout: Duration) -> Self {
        self.scan.tag_read_timeout = timeout;
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no `Player` was supplied
    /// - [`Error::InvalidSetting`] for out-of-range tunables
    pub fn build(self) -> Result<CoreConfig> {
        let player = self.player.ok_or_else(|| Error::CapabilityMissing {
            capability: "Player".to_string(),
            message: "No audio player implementation provided. \
                      Desktop: use bridge_desktop::RodioPlayer or SimulatedPlayer. \
                      Mobile: inject the platform-native player adapter."
                .to_string(),
        })?;

        validate_playback(&self.playback)?;
        validate_scan(&self.scan)?;

        if self.event_buffer_size == 0 {
            return Err(Error::InvalidSetting {
                field: "event_buffer_size",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(CoreConfig {
            player,
            tag_reader: self.tag_reader,
            media_library: self.media_library,
            playback: self.playback,
            scan: self.scan,
            event_buffer_size: self.event_buffer_size,
        })
    }
}

fn validate_playback(settings: &PlaybackSettings) -> Result<()> {
    if !(0.0..=1.0).contains(&settings.initial_volume) {
        return Err(Error::InvalidSetting {
            field: "initial_volume",
            message: format!("{} is outside 0.0..=1.0", settings.initial_volume),
        });
    }

    if settings.status_interval.is_zero() {
        return Err(Error::InvalidSetting {
            field: "status_interval",
            message: "must be greater than zero".to_string(),
        });
    }

    Ok(())
}

fn validate_scan(settings: &ScanSettings) -> Result<()> {
    if settings.max_assets == 0 {
        return Err(Error::InvalidSetting {
            field: "max_assets",
            message: "must be greater than zero".to_string(),
        });
    }

    if settings.tag_read_timeout.is_zero() {
        return Err(Error::InvalidSetting {
            field: "tag_read_timeout",
            message: "must be greater than zero".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{BoundPlayer, PlayerHandle};
    use mockall::mock;

    mock! {
        pub TestPlayer {}

        #[async_trait::async_trait]
        impl Player for TestPlayer {
            async fn bind(&self, uri: &str) -> BridgeResult<BoundPlayer>;
            async fn release(&self, handle: PlayerHandle) -> BridgeResult<()>;
            async fn play(&self, handle: PlayerHandle) -> BridgeResult<()>;
            async fn pause(&self, handle: PlayerHandle) -> BridgeResult<()>;
            async fn seek_to(&self, handle: PlayerHandle, seconds: f64) -> BridgeResult<()>;
            async fn set_volume(&self, handle: PlayerHandle, volume: f32) -> BridgeResult<()>;
        }
    }

    fn player() -> Arc<dyn Player> {
        Arc::new(MockTestPlayer::new())
    }

    #[test]
    fn test_missing_player_is_capability_error() {
        let err = CoreConfig::builder().build().unwrap_err();
        match err {
            Error::CapabilityMissing { capability, .. } => assert_eq!(capability, "Player"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = CoreConfig::builder().player(player()).build().unwrap();

        assert_eq!(config.playback.initial_volume, 1.0);
        assert_eq!(config.playback.status_interval, DEFAULT_STATUS_INTERVAL);
        assert_eq!(config.scan.max_assets, DEFAULT_MEDIA_BATCH_LIMIT);
        assert_eq!(config.scan.tag_read_timeout, DEFAULT_TAG_READ_TIMEOUT);
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(config.tag_reader.is_none());
        assert!(config.media_library.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfig::builder()
            .player(player())
            .initial_volume(0.25)
            .status_interval(Duration::from_millis(250))
            .max_assets(50)
            .tag_read_timeout(Duration::from_millis(300))
            .event_buffer_size(8)
            .build()
            .unwrap();

        assert_eq!(config.playback.initial_volume, 0.25);
        assert_eq!(config.playback.status_interval, Duration::from_millis(250));
        assert_eq!(config.scan.max_assets, 50);
        assert_eq!(config.scan.tag_read_timeout, Duration::from_millis(300));
        assert_eq!(config.event_buffer_size, 8);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let volume = CoreConfig::builder()
            .player(player())
            .initial_volume(1.5)
            .build();
        assert!(matches!(
            volume,
            Err(Error::InvalidSetting {
                field: "initial_volume",
                ..
            })
        ));

        let nan = CoreConfig::builder()
            .player(player())
            .initial_volume(f32::NAN)
            .build();
        assert!(nan.is_err());

        let interval = CoreConfig::builder()
            .player(player())
            .status_interval(Duration::ZERO)
            .build();
        assert!(matches!(
            interval,
            Err(Error::InvalidSetting {
                field: "status_interval",
                ..
            })
        ));

        let assets = CoreConfig::builder().player(player()).max_assets(0).build();
        assert!(matches!(
            assets,
            Err(Error::InvalidSetting {
                field: "max_assets",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_hides_capabilities() {
        let config = CoreConfig::builder().player(player()).build().unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("Player { ... }"));
        assert!(debug.contains("tag_reader: None"));
    }
}
