//! Integration tests for track normalization and display

use bridge_traits::{RawTags, RawYear};
use core_library::{UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use core_metadata::display::NO_METADATA;
use core_metadata::{describe, extract_year, parse_file_name, MetadataNormalizer};

fn normalize(file_name: &str, tags: Option<&RawTags>) -> core_library::Track {
    MetadataNormalizer::new().normalize("id", file_name, "file:///music/x", 0.0, tags)
}

#[test]
fn test_artist_title_split() {
    let cases = [
        ("Daft Punk - One More Time.mp3", "Daft Punk", "One More Time"),
        ("  Air  - La Femme d'Argent.flac", "Air", "La Femme d'Argent"),
        ("Justice - 03. D.A.N.C.E.m4a", "Justice", "D.A.N.C.E"),
        ("A - B - C.ogg", "A", "B - C"),
    ];

    for (file_name, artist, title) in cases {
        let track = normalize(file_name, None);
        assert_eq!(track.artist, artist, "artist for {file_name}");
        assert_eq!(track.title, title, "title for {file_name}");
        assert_eq!(track.album, UNKNOWN_ALBUM);
    }
}

#[test]
fn test_no_separator_keeps_unknown_artist() {
    let track = normalize("Intro_Theme.mp3", None);
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.title, "Intro Theme");

    let track = normalize("12.  some___song.wav", None);
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.title, "some song");

    let track = normalize("Daft Punk-Alive.mp3", None);
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.title, "Daft Punk-Alive");
}

#[test]
fn test_blank_artist_side_is_unknown() {
    let track = normalize(" - Lonely Title.mp3", None);
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.title, "Lonely Title");
}

#[test]
fn test_titles_never_empty() {
    assert_eq!(parse_file_name("01..mp3").title, "01.");
    assert_eq!(parse_file_name("___.mp3").title, "___.mp3");
    assert_eq!(parse_file_name(".mp3").title, ".mp3");
    assert_eq!(parse_file_name("1999.mp3").title, "1999");
    assert_eq!(parse_file_name("   ").title, "Untitled");

    for name in ["", ".", "..", "_", "0", "0.", " - .mp3", "_ - _.mp3"] {
        let track = normalize(name, None);
        assert!(!track.title.trim().is_empty(), "empty title for {name:?}");
    }
}

#[test]
fn test_tags_take_priority() {
    let tags = RawTags::default()
        .with_title("  One   More Time ")
        .with_artist("Daft Punk")
        .with_album("Discovery")
        .with_album_artist("Daft Punk")
        .with_genre("House")
        .with_year("2001-03-12")
        .with_track_number(1)
        .with_disk_number(1);

    let track = normalize("Someone Else - Wrong Title.mp3", Some(&tags));
    assert_eq!(track.title, "One More Time");
    assert_eq!(track.artist, "Daft Punk");
    assert_eq!(track.album, "Discovery");
    assert_eq!(track.album_artist.as_deref(), Some("Daft Punk"));
    assert_eq!(track.genre.as_deref(), Some("House"));
    assert_eq!(track.year, Some(2001));
    assert_eq!(track.track_number, Some(1));
    assert_eq!(track.disk_number, Some(1));
}

#[test]
fn test_blank_tags_fall_back_per_field() {
    let tags = RawTags::default()
        .with_title("   ")
        .with_artist("")
        .with_genre(" ")
        .with_track_number(0);

    let track = normalize("Air - Sexy Boy.mp3", Some(&tags));
    assert_eq!(track.title, "Sexy Boy");
    assert_eq!(track.artist, "Air");
    assert_eq!(track.genre, None);
    assert_eq!(track.track_number, None);
    assert!(track.validate().is_ok());
}

#[test]
fn test_year_extraction() {
    assert_eq!(extract_year(&RawYear::Number(1997)), Some(1997));
    assert_eq!(extract_year(&RawYear::Number(0)), None);
    assert_eq!(extract_year(&RawYear::from("2019-04-01")), Some(2019));
    assert_eq!(extract_year(&RawYear::from("(c) 1998 Virgin")), Some(1998));
    assert_eq!(extract_year(&RawYear::from("20190401")), Some(2019));
    assert_eq!(extract_year(&RawYear::from("'97")), None);
    assert_eq!(extract_year(&RawYear::from("12/3/45")), None);
    assert_eq!(extract_year(&RawYear::from("0000")), None);
    assert_eq!(extract_year(&RawYear::from("")), None);
}

#[test]
fn test_duration_and_passthrough_fields() {
    let track =
        MetadataNormalizer::new().normalize("asset-9", "song.mp3", "file:///a/song.mp3", 212.5, None);
    assert_eq!(track.id, "asset-9");
    assert_eq!(track.uri, "file:///a/song.mp3");
    assert_eq!(track.file_name, "song.mp3");
    assert_eq!(track.duration_ms, Some(212_500));
}

#[test]
fn test_describe_is_idempotent() {
    let tags = RawTags::default().with_artist("Air").with_year(1998_i64);
    let track = normalize("Moon Safari - Kelly.mp3", Some(&tags));

    let first = describe(&track);
    let second = describe(&track);
    assert_eq!(first, second);
    assert_eq!(first.primary, "Kelly");
    assert_eq!(first.secondary, "Air • 1998");
}

#[test]
fn test_describe_without_metadata() {
    let track = normalize("untagged.mp3", None);
    assert_eq!(describe(&track).secondary, NO_METADATA);
}

#[test]
fn test_demo_track_end_to_end() {
    let tags = RawTags::default().with_album("Demo Album");
    let track = MetadataNormalizer::new().normalize("demo", "02 Sample Song.mp3", "demo", 0.0, Some(&tags));

    assert_eq!(track.title, "Sample Song");
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.album, "Demo Album");
    assert_eq!(track.duration_ms, None);

    let desc = describe(&track);
    assert_eq!(desc.primary, "Sample Song");
    assert_eq!(desc.secondary, "Demo Album");
}
