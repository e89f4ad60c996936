//! `file://` URI helpers shared by desktop adapters.
//!
//! Capabilities exchange resources as URI strings. Local files use
//! percent-encoded `file://` URIs; plain paths are accepted on input.

use crate::error::{BridgeError, Result};
use std::path::{Path, PathBuf};

pub const FILE_SCHEME: &str = "file://";

/// Resolve a `file://` URI or plain path to a filesystem path.
///
/// # Errors
///
/// [`BridgeError::Unsupported`] for other schemes (`content://`, `http://`,
/// ...), malformed percent-encoding, or a blank URI.
pub fn path_from_uri(uri: &str) -> Result<PathBuf> {
    if let Some(rest) = uri.strip_prefix(FILE_SCHEME) {
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        let decoded = urlencoding::decode(rest)
            .map_err(|e| BridgeError::Unsupported(format!("{}: {}", uri, e)))?;
        return Ok(PathBuf::from(decoded.into_owned()));
    }

    if uri.contains("://") {
        return Err(BridgeError::Unsupported(format!(
            "unsupported scheme in {}",
            uri
        )));
    }

    if uri.trim().is_empty() {
        return Err(BridgeError::Unsupported("empty URI".to_string()));
    }

    Ok(PathBuf::from(uri))
}

/// Build a percent-encoded `file://` URI for `path`.
pub fn path_to_uri(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let encoded: Vec<String> = text
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    let joined = encoded.join("/");
    if joined.starts_with('/') {
        format!("{}{}", FILE_SCHEME, joined)
    } else {
        format!("{}/{}", FILE_SCHEME, joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_from_uri() {
        assert_eq!(
            path_from_uri("file:///music/Daft%20Punk/01.mp3").unwrap(),
            PathBuf::from("/music/Daft Punk/01.mp3")
        );
        assert_eq!(
            path_from_uri("file://localhost/tmp/a.flac").unwrap(),
            PathBuf::from("/tmp/a.flac")
        );
        assert_eq!(
            path_from_uri("/tmp/plain.ogg").unwrap(),
            PathBuf::from("/tmp/plain.ogg")
        );
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            path_from_uri("content://media/external/audio/1"),
            Err(BridgeError::Unsupported(_))
        ));
        assert!(path_from_uri("  ").is_err());
    }

    #[test]
    fn test_path_to_uri() {
        let uri = path_to_uri(Path::new("/music/Air/Moon Safari/01 La Femme d'Argent.mp3"));
        assert_eq!(
            uri,
            "file:///music/Air/Moon%20Safari/01%20La%20Femme%20d%27Argent.mp3"
        );
        assert_eq!(
            path_from_uri(&uri).unwrap(),
            PathBuf::from("/music/Air/Moon Safari/01 La Femme d'Argent.mp3")
        );
    }
}
