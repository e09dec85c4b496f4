// Unit tests for domain models

use super::*;

fn chapter(start: u64, end: u64, title: &str) -> Chapter {
    Chapter::new(Timestamp::from_secs(start), Timestamp::from_secs(end), title).unwrap()
}

fn sample_metadata() -> MediaMetadata {
    let tags: Tags = [("title", "Foo"), ("ARTIST", "Someone")].into_iter().collect();
    let mut audio_tags = Tags::new();
    audio_tags.insert("language", "eng");
    let mut intro = chapter(0, 60, "Intro");
    intro.insert_tag("description", "Opening; with = signs\nand a newline").unwrap();

    MediaMetadata::new(
        tags,
        vec![
            StreamMetadata::new(0, CodecType::Video),
            StreamMetadata::with_tags(1, CodecType::Audio, audio_tags),
        ],
        vec![intro, chapter(60, 120, "Body")],
    )
    .unwrap()
}

#[test]
fn test_timestamp_parse_seconds() {
    assert_eq!(Timestamp::parse("90.5").unwrap().as_millis(), 90_500);
    assert_eq!(Timestamp::parse("7").unwrap().as_millis(), 7_000);
}

#[test]
fn test_timestamp_parse_mm_ss() {
    assert_eq!(Timestamp::parse("01:30.5").unwrap().as_millis(), 90_500);
    assert_eq!(Timestamp::parse("1:30").unwrap().as_millis(), 90_000);
}

#[test]
fn test_timestamp_parse_hh_mm_ss() {
    let time = Timestamp::parse("01:02:03.456").unwrap();
    assert_eq!(time, Timestamp::from_components(1, 2, 3, 456).unwrap());
    assert_eq!(Timestamp::parse("00:00:00.005").unwrap().as_millis(), 5);
}

#[test]
fn test_timestamp_parse_invalid() {
    assert!(Timestamp::parse("invalid").is_err());
    assert!(Timestamp::parse("").is_err());
    assert!(Timestamp::parse("00:60").is_err());
    assert!(Timestamp::parse("01:60:00").is_err());
    assert!(Timestamp::parse("-10").is_err());
    assert!(Timestamp::parse("1.2345").is_err());
    assert!(Timestamp::parse("1:2:3:4").is_err());
}

#[test]
fn test_timestamp_parse_too_large() {
    let err = Timestamp::parse("999999999999999999").unwrap_err();
    assert!(matches!(err, DomainError::BadArgs(_)));
    assert!(Timestamp::parse("99999999999999999:00:00").is_err());
    assert!(Timestamp::parse("307445734561825:59").is_err());
    assert!(Timestamp::parse("99999999999999999999999").is_err());
    assert!(Timestamp::from_components(u64::MAX, 0, 0, 0).is_err());
    assert_eq!(Timestamp::from_secs(u64::MAX).as_millis(), u64::MAX);
    assert!(Timestamp::from_secs_f64(1e300).is_err());
}

#[test]
fn test_timestamp_display() {
    assert_eq!(Timestamp::from_components(1, 2, 3, 456).unwrap().to_string(), "01:02:03.456");
    assert_eq!(Timestamp::from_millis(61_005).to_string(), "00:01:01.005");
}

#[test]
fn test_timestamp_from_secs_f64_rounds() {
    assert_eq!(Timestamp::from_secs_f64(60.0004).unwrap().as_millis(), 60_000);
    assert_eq!(Timestamp::from_secs_f64(1.9999).unwrap().as_millis(), 2_000);
    assert!(Timestamp::from_secs_f64(-1.0).is_err());
    assert!(Timestamp::from_secs_f64(f64::NAN).is_err());
}

#[test]
fn test_tags_case_insensitive() {
    let mut tags = Tags::new();
    tags.insert("Title", "First");
    assert_eq!(tags.get("TITLE"), Some("First"));

    let previous = tags.insert("title", "Second");
    assert_eq!(previous.as_deref(), Some("First"));
    assert_eq!(tags.len(), 1);
    // original spelling survives a replacement
    assert_eq!(tags.keys().next(), Some("Title"));
    assert_eq!(tags.get("title"), Some("Second"));

    assert_eq!(tags.remove("tItLe").as_deref(), Some("Second"));
    assert!(tags.is_empty());
}

#[test]
fn test_tags_preserve_insertion_order_in_json() {
    let tags: Tags = [("zeta", "1"), ("alpha", "2"), ("mid", "3")].into_iter().collect();
    let json = serde_json::to_string(&tags).unwrap();
    assert_eq!(json, r#"{"zeta":"1","alpha":"2","mid":"3"}"#);

    let back: Tags = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tags);
}

#[test]
fn test_codec_type_unknown_fallback() {
    let parsed: CodecType = serde_json::from_str(r#""attachment""#).unwrap();
    assert_eq!(parsed, CodecType::Unknown);
    assert_eq!(CodecType::from_probe_name("Subtitle"), CodecType::Subtitle);
}

#[test]
fn test_chapter_requires_end_after_start() {
    assert!(Chapter::new(Timestamp::from_secs(10), Timestamp::from_secs(10), "x").is_err());
    assert!(Chapter::new(Timestamp::from_secs(10), Timestamp::from_secs(5), "x").is_err());
}

#[test]
fn test_chapter_always_has_title_key() {
    let chapter = Chapter::with_tags(Timestamp::ZERO, Timestamp::from_secs(1), Tags::new()).unwrap();
    assert!(chapter.tags().contains_key(TITLE_KEY));
    assert_eq!(chapter.title(), "");
}

#[test]
fn test_overlapping_chapters_rejected() {
    let result = MediaMetadata::new(
        Tags::new(),
        vec![],
        vec![chapter(0, 10, "A"), chapter(5, 15, "B")],
    );
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[test]
fn test_adjacent_chapters_accepted() {
    let metadata = MediaMetadata::new(
        Tags::new(),
        vec![],
        vec![chapter(0, 10, "A"), chapter(10, 20, "B")],
    )
    .unwrap();
    assert_eq!(metadata.chapters().len(), 2);
}

#[test]
fn test_unsorted_chapters_rejected() {
    let result = MediaMetadata::new(
        Tags::new(),
        vec![],
        vec![chapter(20, 30, "B"), chapter(0, 10, "A")],
    );
    assert!(result.is_err());
}

#[test]
fn test_duplicate_stream_index_rejected() {
    let result = MediaMetadata::new(
        Tags::new(),
        vec![
            StreamMetadata::new(0, CodecType::Video),
            StreamMetadata::new(0, CodecType::Audio),
        ],
        vec![],
    );
    assert!(result.is_err());
}

#[test]
fn test_set_chapters_keeps_previous_on_error() {
    let mut metadata = sample_metadata();
    let before = metadata.chapters().to_vec();

    let result = metadata.set_chapters(vec![chapter(0, 10, "A"), chapter(5, 15, "B")]);

    assert!(result.is_err());
    assert_eq!(metadata.chapters(), before.as_slice());
}

#[test]
fn test_push_chapter_enforces_order() {
    let mut metadata = sample_metadata();
    assert!(metadata.push_chapter(chapter(100, 130, "Late")).is_err());
    metadata.push_chapter(chapter(120, 130, "Outro")).unwrap();
    assert_eq!(metadata.chapters().last().unwrap().title(), "Outro");
}

#[test]
fn test_ensure_complete_requires_titles() {
    let untitled = Chapter::with_tags(Timestamp::ZERO, Timestamp::from_secs(5), Tags::new()).unwrap();
    let metadata = MediaMetadata::new(Tags::new(), vec![], vec![untitled]).unwrap();
    assert!(metadata.ensure_complete().is_err());
    assert!(sample_metadata().ensure_complete().is_ok());
}

#[test]
fn test_json_round_trip() {
    let metadata = sample_metadata();
    let json = metadata.to_json().unwrap();
    let back = MediaMetadata::from_json(&json).unwrap();
    assert_eq!(back, metadata);
}

#[test]
fn test_json_shape() {
    let json = sample_metadata().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["tags"]["title"], "Foo");
    assert_eq!(value["streams"][0]["index"], 0);
    assert_eq!(value["streams"][0]["codec_type"], "video");
    assert_eq!(value["streams"][1]["tags"]["language"], "eng");
    assert_eq!(value["chapters"][0]["start"], 0);
    assert_eq!(value["chapters"][0]["end"], 60_000);
    assert_eq!(value["chapters"][1]["tags"]["title"], "Body");
}

#[test]
fn test_from_json_validates_chapters() {
    let json = r#"{
        "tags": {},
        "streams": [],
        "chapters": [
            {"start": 0, "end": 10000, "tags": {"title": "A"}},
            {"start": 5000, "end": 15000, "tags": {"title": "B"}}
        ]
    }"#;
    let err = MediaMetadata::from_json(json).unwrap_err();
    assert!(matches!(err, DomainError::Serialization(_)));
}

#[test]
fn test_from_json_fills_missing_sections() {
    let metadata = MediaMetadata::from_json(r#"{"tags": {"title": "Only"}}"#).unwrap();
    assert_eq!(metadata.tags().get("title"), Some("Only"));
    assert!(metadata.streams().is_empty());
    assert!(metadata.chapters().is_empty());
}

#[test]
fn test_from_json_rejects_timing_tag_on_chapter() {
    let json = r#"{"chapters": [{"start": 0, "end": 5000, "tags": {"title": "A", "start": "beginning"}}]}"#;
    let err = MediaMetadata::from_json(json).unwrap_err();
    assert!(err.to_string().contains("reserved for chapter timing"));

    let mut chapter = chapter(0, 5, "A");
    assert!(matches!(chapter.insert_tag("End", "x"), Err(DomainError::Validation(_))));
    assert!(chapter.insert_tag("language", "eng").is_ok());
}
