// Unit tests for business rules

use super::*;

fn chapter(start: u64, end: u64, title: &str) -> Chapter {
    Chapter::new(Timestamp::from_secs(start), Timestamp::from_secs(end), title).unwrap()
}

#[test]
fn test_chapter_order_overlap_message() {
    let err = validate_chapter_order(&[chapter(0, 10, "A"), chapter(5, 15, "B")]).unwrap_err();
    assert!(err.to_string().contains("overlaps chapter 1"));
}

#[test]
fn test_chapter_order_empty_and_single() {
    assert!(validate_chapter_order(&[]).is_ok());
    assert!(validate_chapter_order(&[chapter(3, 4, "A")]).is_ok());
}

#[test]
fn test_chapter_order_allows_gaps() {
    assert!(validate_chapter_order(&[chapter(0, 10, "A"), chapter(30, 40, "B")]).is_ok());
}

#[test]
fn test_check_chapter_fits_previous() {
    let accepted = vec![chapter(0, 60, "Intro")];
    assert!(check_chapter_fits(&accepted, None, &chapter(30, 90, "Body")).is_err());
    assert!(check_chapter_fits(&accepted, None, &chapter(60, 90, "Body")).is_ok());
}

#[test]
fn test_check_chapter_fits_next() {
    let next = chapter(100, 120, "Outro");
    assert!(check_chapter_fits(&[], Some(&next), &chapter(90, 110, "Body")).is_err());
    assert!(check_chapter_fits(&[], Some(&next), &chapter(90, 100, "Body")).is_ok());
}

#[test]
fn test_stream_order() {
    let streams = vec![
        StreamMetadata::new(0, CodecType::Video),
        StreamMetadata::new(2, CodecType::Audio),
    ];
    assert!(validate_stream_order(&streams).is_ok());

    let reversed: Vec<_> = streams.into_iter().rev().collect();
    assert!(validate_stream_order(&reversed).is_err());
}

#[test]
fn test_chapter_titles() {
    assert!(validate_chapter_titles(&[chapter(0, 1, "A")]).is_ok());
    let err = validate_chapter_titles(&[chapter(0, 1, "A"), chapter(1, 2, "   ")]).unwrap_err();
    assert!(err.to_string().contains("chapter 2"));
}

#[test]
fn test_pattern_validator_is_anchored() {
    let validator = TagValidator::pattern(r"\d+").unwrap();
    assert!(validator.validate("42").is_ok());
    assert!(validator.validate("42a").is_err());
    assert!(TagValidator::pattern("(").is_err());
}

#[test]
fn test_date_format_validator() {
    let date = TagValidator::DateFormat("%Y-%m-%d".to_string());
    assert!(date.validate("2021-06-01").is_ok());
    assert!(date.validate("06/01/2021").is_err());

    let datetime = TagValidator::DateFormat("%Y-%m-%d %H:%M:%S".to_string());
    assert!(datetime.validate("2021-06-01 12:30:00").is_ok());
    assert!(datetime.validate("2021-06-01").is_err());
}

#[test]
fn test_max_length_counts_chars() {
    let validator = TagValidator::MaxLength(3);
    assert!(validator.validate("äöü").is_ok());
    assert!(validator.validate("abcd").is_err());
}

#[test]
fn test_validate_tag_value_collects_failures() {
    let validators = vec![TagValidator::MaxLength(1), TagValidator::choice(&["a"])];
    let err = validate_tag_value(&validators, "bb").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("longer than 1"));
    assert!(message.contains("not a valid choice"));
}

#[test]
fn test_reserved_chapter_tags() {
    let ok: Tags = [("title", "A"), ("starting", "x")].into_iter().collect();
    assert!(validate_chapter_tags(&ok).is_ok());

    for key in ["start", "END", "TimeBase"] {
        let tags: Tags = [("title", "A"), (key, "x")].into_iter().collect();
        let err = validate_chapter_tags(&tags).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains(key));
    }
}
