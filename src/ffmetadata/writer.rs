//! Serializes [`MediaMetadata`] into an exchange document

use std::fmt::Write;

use super::{CHAPTER_SECTION, HEADER, STREAM_SECTION};
use crate::domain::fields::write_key_for;
use crate::domain::model::{Chapter, MediaMetadata, Tags, TITLE_KEY};
use crate::utils::time::Timebase;

/// Backslash-escape the characters the format treats specially
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n' | '\r') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a key, including a leading `[` that would read as a section header
fn escape_key(key: &str) -> String {
    let escaped = escape(key);
    if escaped.starts_with('[') {
        format!("\\{}", escaped)
    } else {
        escaped
    }
}

fn write_tag(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{}={}", escape_key(key), escape(value));
}

/// Global tags, renamed to the keys the muxer expects
fn write_global_tags(out: &mut String, tags: &Tags) {
    for (key, value) in tags.iter() {
        match write_key_for(key) {
            Some(write_key) => write_tag(out, &write_key, value),
            None => write_tag(out, key, value),
        }
    }
}

fn write_tags(out: &mut String, tags: &Tags) {
    for (key, value) in tags.iter() {
        write_tag(out, key, value);
    }
}

fn write_chapter(out: &mut String, chapter: &Chapter) {
    let timebase = Timebase::MILLIS;
    out.push_str(CHAPTER_SECTION);
    out.push('\n');
    let _ = writeln!(out, "TIMEBASE={}/{}", timebase.num, timebase.den);
    let _ = writeln!(out, "START={}", chapter.start().as_millis());
    let _ = writeln!(out, "END={}", chapter.end().as_millis());
    write_tag(out, TITLE_KEY, chapter.title());
    for (key, value) in chapter.extra_tags() {
        write_tag(out, key, value);
    }
}

/// Produce the exchange document for a single reencode pass.
///
/// Global tags come first, under their muxer spelling where the catalogue
/// has one (`sort_album` is written as `album-sort`), then one `[STREAM]` section per stream in
/// index order (the k-th section belongs to `metadata.streams()[k]`), then
/// one `[CHAPTER]` section per chapter in timeline order.
pub fn serialize_for_apply(metadata: &MediaMetadata) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    write_global_tags(&mut out, metadata.tags());

    for stream in metadata.streams() {
        out.push('\n');
        out.push_str(STREAM_SECTION);
        out.push('\n');
        write_tags(&mut out, &stream.tags);
    }

    for chapter in metadata.chapters() {
        out.push('\n');
        write_chapter(&mut out, chapter);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CodecType, StreamMetadata, Timestamp};

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a=b;c#d\\e"), "a\\=b\\;c\\#d\\\\e");
        assert_eq!(escape("line\nbreak"), "line\\\nbreak");
    }

    #[test]
    fn test_serialize_layout() {
        let mut tags = Tags::new();
        tags.insert("title", "Foo");
        let mut chapter = Chapter::new(Timestamp::ZERO, Timestamp::from_secs(60), "Intro").unwrap();
        chapter.insert_tag("description", "First").unwrap();
        let metadata = MediaMetadata::new(
            tags,
            vec![StreamMetadata::new(0, CodecType::Video)],
            vec![chapter],
        )
        .unwrap();

        let expected = "\
;FFMETADATA1
title=Foo

[STREAM]

[CHAPTER]
TIMEBASE=1/1000
START=0
END=60000
title=Intro
description=First
";
        assert_eq!(serialize_for_apply(&metadata), expected);
    }

    #[test]
    fn test_key_that_looks_like_a_section() {
        let mut tags = Tags::new();
        tags.insert("[CHAPTER]x", "1");
        tags.insert("note", "[STREAM]");
        let metadata = MediaMetadata::new(tags, vec![], vec![]).unwrap();

        let document = serialize_for_apply(&metadata);
        assert!(document.contains("\n\\[CHAPTER]x=1\n"));
        assert!(document.contains("\nnote=[STREAM]\n"));

        let decoded = crate::ffmetadata::parse_exchange(&document).unwrap();
        assert!(decoded.chapters.is_empty());
        assert_eq!(decoded.global.get("[CHAPTER]x"), Some("1"));
    }

    #[test]
    fn test_sort_tags_use_muxer_keys() {
        let mut tags = Tags::new();
        tags.insert("sort_artist", "Beatles, The");
        let mut audio = Tags::new();
        audio.insert("sort_artist", "kept");
        let metadata = MediaMetadata::new(
            tags,
            vec![StreamMetadata::with_tags(0, CodecType::Audio, audio)],
            vec![],
        )
        .unwrap();

        let document = serialize_for_apply(&metadata);
        assert!(document.contains(";FFMETADATA1\nartist-sort=Beatles, The\n"));
        assert!(document.contains("[STREAM]\nsort_artist=kept\n"));
    }

    #[test]
    fn test_serialize_empty_metadata() {
        assert_eq!(serialize_for_apply(&MediaMetadata::default()), ";FFMETADATA1\n");
    }

    #[test]
    fn test_title_written_before_extra_tags() {
        let mut tags = Tags::new();
        tags.insert("language", "eng");
        tags.insert("title", "Late title");
        let chapter = Chapter::with_tags(Timestamp::ZERO, Timestamp::from_secs(1), tags).unwrap();
        let metadata = MediaMetadata::new(Tags::new(), vec![], vec![chapter]).unwrap();

        let document = serialize_for_apply(&metadata);
        let title_at = document.find("title=Late title").unwrap();
        let language_at = document.find("language=eng").unwrap();
        assert!(title_at < language_at);
        assert_eq!(document.matches("title=").count(), 1);
    }
}
