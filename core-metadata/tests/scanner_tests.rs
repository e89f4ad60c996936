//! Integration tests for the library scanner

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{MediaAsset, MediaLibrary, RawTags, TagReader};
use core_library::UNKNOWN_ARTIST;
use core_metadata::{LibraryScanner, MetadataError};
use core_runtime::config::ScanSettings;
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Library {}

    #[async_trait]
    impl MediaLibrary for Library {
        async fn list_audio_assets(&self, limit: usize) -> BridgeResult<Vec<MediaAsset>>;
    }
}

/// Tag reader answering from a fixed table; unknown URIs fail, `slow://` hangs.
struct TableTagReader {
    tags: HashMap<String, RawTags>,
}

#[async_trait]
impl TagReader for TableTagReader {
    async fn read_tags(&self, uri: &str) -> BridgeResult<RawTags> {
        if uri.starts_with("slow://") {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.tags
            .get(uri)
            .cloned()
            .ok_or_else(|| BridgeError::NotAvailable(uri.to_string()))
    }
}

fn asset(id: &str, file_name: &str, uri: &str) -> MediaAsset {
    MediaAsset {
        id: id.to_string(),
        file_name: file_name.to_string(),
        uri: uri.to_string(),
        duration_secs: 180.0,
        album_id: None,
    }
}

fn library_with(assets: Vec<MediaAsset>) -> Arc<MockLibrary> {
    let mut library = MockLibrary::new();
    library
        .expect_list_audio_assets()
        .returning(move |limit| Ok(assets.iter().take(limit).cloned().collect()));
    Arc::new(library)
}

fn settings(max_assets: usize) -> ScanSettings {
    ScanSettings {
        max_assets,
        tag_read_timeout: Duration::from_millis(200),
    }
}

#[tokio::test]
async fn test_scan_without_tag_reader_uses_file_names() {
    let library = library_with(vec![
        asset("1", "Air - Kelly.mp3", "file:///m/1.mp3"),
        asset("2", "02 Sample Song.mp3", "file:///m/2.mp3"),
    ]);

    let report = LibraryScanner::new(library, settings(10)).scan().await.unwrap();

    assert_eq!(report.tag_failures, 0);
    assert_eq!(report.tracks.len(), 2);
    assert_eq!(report.tracks[0].id, "1");
    assert_eq!(report.tracks[0].artist, "Air");
    assert_eq!(report.tracks[1].title, "Sample Song");
    assert_eq!(report.tracks[1].artist, UNKNOWN_ARTIST);
    assert_eq!(report.tracks[1].duration_ms, Some(180_000));
}

#[tokio::test(start_paused = true)]
async fn test_tag_failures_degrade_to_file_names() {
    let library = library_with(vec![
        asset("tagged", "x.mp3", "file:///m/tagged.mp3"),
        asset("missing", "Justice - Genesis.mp3", "file:///m/missing.mp3"),
        asset("slow", "Slow - Song.mp3", "slow://m/slow.mp3"),
    ]);

    let mut tags = HashMap::new();
    tags.insert(
        "file:///m/tagged.mp3".to_string(),
        RawTags::default().with_title("Real Title").with_album("Real Album"),
    );
    let reader = Arc::new(TableTagReader { tags });

    let report = LibraryScanner::new(library, settings(10))
        .with_tag_reader(reader)
        .scan()
        .await
        .unwrap();

    assert_eq!(report.tag_failures, 2);
    assert_eq!(report.tracks[0].title, "Real Title");
    assert_eq!(report.tracks[0].album, "Real Album");
    assert_eq!(report.tracks[1].artist, "Justice");
    assert_eq!(report.tracks[1].title, "Genesis");
    assert_eq!(report.tracks[2].artist, "Slow");
}

#[tokio::test]
async fn test_scan_respects_limit() {
    let assets = (0..5)
        .map(|i| asset(&i.to_string(), &format!("{i:02} Track.mp3"), "demo"))
        .collect();
    let library = library_with(assets);

    let report = LibraryScanner::new(library, settings(3)).scan().await.unwrap();
    assert_eq!(report.tracks.len(), 3);
}

#[tokio::test]
async fn test_scan_emits_events() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let library = library_with(vec![asset("1", "a.mp3", "demo")]);

    LibraryScanner::new(library, settings(7))
        .with_event_bus(bus.clone())
        .scan()
        .await
        .unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Library(LibraryEvent::ScanStarted { limit: 7 })
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Library(LibraryEvent::ScanCompleted {
            track_count: 1,
            tag_failures: 0,
        })
    );
}

#[tokio::test]
async fn test_enumeration_failure() {
    let mut library = MockLibrary::new();
    library
        .expect_list_audio_assets()
        .returning(|_| Err(BridgeError::NotAvailable("permission denied".to_string())));

    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();

    let result = LibraryScanner::new(Arc::new(library), settings(10))
        .with_event_bus(bus)
        .scan()
        .await;

    assert!(matches!(result, Err(MetadataError::LibraryUnavailable(_))));
    let _started = rx.recv().await.unwrap();
    assert!(matches!(
        rx.recv().await.unwrap(),
        CoreEvent::Library(LibraryEvent::ScanFailed { .. })
    ));
}
