//! Desktop bootstrap using the `bridge-desktop` adapters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bridge_desktop::{DirectoryMediaLibrary, SimulatedPlayer};
use bridge_traits::Player;
use core_metadata::LoftyTagReader;
use core_runtime::config::{CoreConfig, CoreConfigBuilder, DEFAULT_STATUS_INTERVAL};
#[cfg(feature = "rodio-output")]
use tracing::warn;

use crate::{CoreService, Result};

impl CoreService {
    /// Build a service on desktop defaults.
    ///
    /// Audio goes to the default output device when the `rodio-output`
    /// feature is enabled and a device opens, and to a [`SimulatedPlayer`]
    /// otherwise. Tags are read with `lofty`; library scans walk
    /// `music_root` when one is given.
    pub fn desktop(music_root: Option<PathBuf>) -> Result<Self> {
        let config = desktop_config(music_root).build()?;
        Ok(Self::new(config))
    }
}

/// Builder pre-populated with the desktop adapters, for further tuning.
pub fn desktop_config(music_root: Option<PathBuf>) -> CoreConfigBuilder {
    let mut builder = CoreConfig::builder()
        .player(desktop_player(DEFAULT_STATUS_INTERVAL))
        .tag_reader(Arc::new(LoftyTagReader::new()));

    if let Some(root) = music_root {
        builder = builder.media_library(Arc::new(DirectoryMediaLibrary::new(root)));
    }
    builder
}

#[cfg(feature = "rodio-output")]
fn desktop_player(status_interval: Duration) -> Arc<dyn Player> {
    match bridge_desktop::RodioPlayer::new(status_interval) {
        Ok(player) => Arc::new(player),
        Err(e) => {
            warn!(error = %e, "Audio output unavailable, using simulated player");
            Arc::new(SimulatedPlayer::new(status_interval))
        }
    }
}

#[cfg(not(feature = "rodio-output"))]
fn desktop_player(status_interval: Duration) -> Arc<dyn Player> {
    Arc::new(SimulatedPlayer::new(status_interval))
}
