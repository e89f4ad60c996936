//! Directory-backed media library.
//!
//! Enumerates audio files beneath a root directory the way a phone's media
//! store exposes its audio collection: one [`MediaAsset`] per file, with the
//! parent directory standing in for the album grouping.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::uri::path_to_uri;
use bridge_traits::{MediaAsset, MediaLibrary};
use lofty::file::AudioFile;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

/// File extensions treated as audio.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "m4a", "aac", "wav"];

/// [`MediaLibrary`] over a local directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryMediaLibrary {
    root: PathBuf,
    follow_links: bool,
    include_hidden: bool,
}

impl DirectoryMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: true,
            include_hidden: false,
        }
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan_blocking(&self, limit: usize) -> Result<Vec<MediaAsset>> {
        if !self.root.is_dir() {
            return Err(BridgeError::NotAvailable(format!(
                "media root {} is not a directory",
                self.root.display()
            )));
        }

        let include_hidden = self.include_hidden;
        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        let mut assets = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            if assets.len() >= limit {
                break;
            }
            let path = entry.path();
            if !entry.file_type().is_file() || !is_audio_file(path) {
                continue;
            }
            assets.push(self.asset_for(path));
        }

        Ok(assets)
    }

    fn asset_for(&self, path: &Path) -> MediaAsset {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let id = relative.to_string_lossy().replace('\\', "/");
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());
        let album_id = relative
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_string_lossy().replace('\\', "/"));

        MediaAsset {
            id,
            file_name,
            uri: path_to_uri(path),
            duration_secs: probe_duration_secs(path),
            album_id,
        }
    }
}

#[async_trait]
impl MediaLibrary for DirectoryMediaLibrary {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn list_audio_assets(&self, limit: usize) -> Result<Vec<MediaAsset>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let library = self.clone();
        let assets = tokio::task::spawn_blocking(move || library.scan_blocking(limit))
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("media scan task failed: {}", e)))??;

        debug!(count = assets.len(), "Enumerated audio assets");
        Ok(assets)
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Container duration in seconds, `0.0` when the file cannot be probed.
fn probe_duration_secs(path: &Path) -> f64 {
    match lofty::read_from_path(path) {
        Ok(tagged) => tagged.properties().duration().as_secs_f64(),
        Err(e) => {
            trace!(path = %path.display(), error = %e, "Duration probe failed");
            0.0
        }
    }
}
