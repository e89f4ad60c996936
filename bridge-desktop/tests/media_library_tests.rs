use bridge_desktop::DirectoryMediaLibrary;
use bridge_traits::{BridgeError, MediaLibrary};
use std::fs;
use tempfile::TempDir;

fn music_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let album = dir.path().join("Demo Album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("02 Sample Song.mp3"), b"not really audio").unwrap();
    fs::write(album.join("01 Intro.flac"), b"not really audio").unwrap();
    fs::write(album.join("cover.jpg"), b"jpeg").unwrap();
    fs::write(dir.path().join("loose track.ogg"), b"ogg").unwrap();

    let hidden = dir.path().join(".trash");
    fs::create_dir_all(&hidden).unwrap();
    fs::write(hidden.join("deleted.mp3"), b"gone").unwrap();
    dir
}

#[tokio::test]
async fn test_lists_audio_files_only() {
    let dir = music_dir();
    let library = DirectoryMediaLibrary::new(dir.path());

    let assets = library.list_audio_assets(100).await.unwrap();
    let ids: Vec<&str> = assets.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Demo Album/01 Intro.flac",
            "Demo Album/02 Sample Song.mp3",
            "loose track.ogg",
        ]
    );

    let song = &assets[1];
    assert_eq!(song.file_name, "02 Sample Song.mp3");
    assert_eq!(song.album_id.as_deref(), Some("Demo Album"));
    assert!(song.uri.starts_with("file://"));
    assert!(song.uri.ends_with("02%20Sample%20Song.mp3"));
    // Undecodable files still enumerate, with an unknown duration.
    assert_eq!(song.duration_secs, 0.0);

    assert_eq!(assets[2].album_id, None);
}

#[tokio::test]
async fn test_hidden_entries_can_be_included() {
    let dir = music_dir();
    let library = DirectoryMediaLibrary::new(dir.path()).include_hidden(true);

    let assets = library.list_audio_assets(100).await.unwrap();
    assert!(assets.iter().any(|a| a.id == ".trash/deleted.mp3"));
}

#[tokio::test]
async fn test_respects_limit() {
    let dir = music_dir();
    let library = DirectoryMediaLibrary::new(dir.path());

    assert_eq!(library.list_audio_assets(2).await.unwrap().len(), 2);
    assert!(library.list_audio_assets(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_root_is_unavailable() {
    let library = DirectoryMediaLibrary::new("/definitely/not/a/music/dir");
    let result = library.list_audio_assets(10).await;
    assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
}
