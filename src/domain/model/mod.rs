// Domain models - Core types and data structures

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::DomainError;
use crate::domain::rules;

#[cfg(test)]
mod tests;

/// Key under which a chapter stores its name
pub const TITLE_KEY: &str = "title";

/// Offset into the media timeline with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Zero offset
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create a timestamp from milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create a timestamp from whole seconds, saturating at the largest offset
    pub fn from_secs(seconds: u64) -> Self {
        Self(seconds.saturating_mul(1000))
    }

    /// Create a timestamp from hours, minutes, seconds, milliseconds
    pub fn from_components(
        hours: u64,
        minutes: u64,
        seconds: u64,
        milliseconds: u64,
    ) -> Result<Self, DomainError> {
        hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .and_then(|m| m.checked_mul(60))
            .and_then(|s| s.checked_add(seconds))
            .and_then(|s| s.checked_mul(1000))
            .and_then(|ms| ms.checked_add(milliseconds))
            .map(Self)
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Time {}:{:02}:{:02}.{:03} is too large",
                    hours, minutes, seconds, milliseconds
                ))
            })
    }

    /// Create a timestamp from fractional seconds, rounding to the nearest millisecond
    pub fn from_secs_f64(seconds: f64) -> Result<Self, DomainError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Time offset must be a non-negative number, got {}",
                seconds
            )));
        }
        let millis = (seconds * 1000.0).round();
        // u64::MAX as f64 rounds up to 2^64, so anything at or past it does not fit
        if millis >= u64::MAX as f64 {
            return Err(DomainError::BadArgs(format!("Time offset {} is too large", seconds)));
        }
        Ok(Self(millis as u64))
    }

    /// Milliseconds since the start of the media
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Parse a user-supplied time in `HH:MM:SS.fff`, `MM:SS.fff` or seconds form
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();
        if trimmed.is_empty() {
            return Err(DomainError::BadArgs("Time cannot be empty".to_string()));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds_part) = match parts.as_slice() {
            [seconds] => (0, 0, *seconds),
            [minutes, seconds] => (0, parse_component(minutes, "minutes")?, *seconds),
            [hours, minutes, seconds] => {
                let minutes = parse_component(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                (parse_component(hours, "hours")?, minutes, *seconds)
            }
            _ => {
                return Err(DomainError::BadArgs(format!(
                    "Invalid time '{}'. Supported formats: seconds (e.g., 90.5), MM:SS.fff (e.g., 1:30.5), HH:MM:SS.fff (e.g., 01:02:30.500)",
                    trimmed
                )))
            }
        };

        let (whole, fraction) = match seconds_part.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (seconds_part, ""),
        };
        let seconds = parse_component(whole, "seconds")?;
        if parts.len() > 1 && seconds >= 60 {
            return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
        }
        if fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::BadArgs(format!(
                "Invalid milliseconds '{}', expected up to three digits",
                fraction
            )));
        }
        // "5" -> 500ms, "05" -> 50ms, "005" -> 5ms
        let millis = if fraction.is_empty() {
            0
        } else {
            format!("{:0<3}", fraction).parse::<u64>().unwrap_or(0)
        };

        Self::from_components(hours, minutes, seconds, millis)
    }

    /// Format as HH:MM:SS.fff
    pub fn format_hms(&self) -> String {
        let hours = self.0 / 3_600_000;
        let minutes = (self.0 % 3_600_000) / 60_000;
        let seconds = (self.0 % 60_000) / 1000;
        let millis = self.0 % 1000;
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}

fn parse_component(value: &str, name: &str) -> Result<u64, DomainError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::BadArgs(format!("Invalid {} '{}'", name, value)));
    }
    value
        .parse::<u64>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} '{}'", name, value)))
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Ordered tag mapping with case-insensitive keys.
///
/// Keys keep the spelling they were first inserted with; inserting an
/// existing key under a different case replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

impl Tags {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(key))
    }

    /// Look up a value by key, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].1.as_str())
    }

    /// Check whether a key is present, ignoring case
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagsVisitor;

        impl<'de> Visitor<'de> for TagsVisitor {
            type Value = Tags;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string tag keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Tags, A::Error> {
                let mut tags = Tags::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    tags.insert(key, value);
                }
                Ok(tags)
            }
        }

        deserializer.deserialize_map(TagsVisitor)
    }
}

/// Kind of elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
    #[serde(other)]
    Unknown,
}

impl CodecType {
    /// Map the probe tool's codec type name
    pub fn from_probe_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            "data" => CodecType::Data,
            _ => CodecType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Data => "data",
            CodecType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Tags of a single audio/video/subtitle stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMetadata {
    pub index: u32,
    pub codec_type: CodecType,
    #[serde(default)]
    pub tags: Tags,
}

impl StreamMetadata {
    pub fn new(index: u32, codec_type: CodecType) -> Self {
        Self {
            index,
            codec_type,
            tags: Tags::new(),
        }
    }

    pub fn with_tags(index: u32, codec_type: CodecType, tags: Tags) -> Self {
        Self {
            index,
            codec_type,
            tags,
        }
    }
}

/// Named time range in the media timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChapter")]
pub struct Chapter {
    start: Timestamp,
    end: Timestamp,
    tags: Tags,
}

#[derive(Deserialize)]
struct RawChapter {
    start: Timestamp,
    end: Timestamp,
    #[serde(default)]
    tags: Tags,
}

impl TryFrom<RawChapter> for Chapter {
    type Error = DomainError;

    fn try_from(raw: RawChapter) -> Result<Self, Self::Error> {
        Chapter::with_tags(raw.start, raw.end, raw.tags)
    }
}

impl Chapter {
    /// Create a chapter with a title and no other tags
    pub fn new(start: Timestamp, end: Timestamp, title: impl Into<String>) -> Result<Self, DomainError> {
        let mut tags = Tags::new();
        tags.insert(TITLE_KEY, title);
        Self::with_tags(start, end, tags)
    }

    /// Create a chapter from a full tag mapping; a missing title becomes empty
    pub fn with_tags(start: Timestamp, end: Timestamp, mut tags: Tags) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::Validation(format!(
                "chapter end {} must be after its start {}",
                end, start
            )));
        }
        rules::validate_chapter_tags(&tags)?;
        if !tags.contains_key(TITLE_KEY) {
            tags.insert(TITLE_KEY, "");
        }
        Ok(Self { start, end, tags })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn title(&self) -> &str {
        self.tags.get(TITLE_KEY).unwrap_or_default()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Tags other than the title, in insertion order
    pub fn extra_tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case(TITLE_KEY))
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.tags.insert(TITLE_KEY, title);
    }

    /// Set a tag; the title key can be overwritten but never removed
    pub fn insert_tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), DomainError> {
        let key = key.into();
        if rules::is_reserved_chapter_key(&key) {
            return Err(DomainError::Validation(format!(
                "chapter tag '{}' is reserved for chapter timing",
                key
            )));
        }
        self.tags.insert(key, value);
        Ok(())
    }

    /// Check whether two chapters share any part of the timeline
    pub fn overlaps(&self, other: &Chapter) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Global tags, stream tags and chapters of one media file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMediaMetadata")]
pub struct MediaMetadata {
    tags: Tags,
    streams: Vec<StreamMetadata>,
    chapters: Vec<Chapter>,
}

#[derive(Deserialize)]
struct RawMediaMetadata {
    #[serde(default)]
    tags: Tags,
    #[serde(default)]
    streams: Vec<StreamMetadata>,
    #[serde(default)]
    chapters: Vec<Chapter>,
}

impl TryFrom<RawMediaMetadata> for MediaMetadata {
    type Error = DomainError;

    fn try_from(raw: RawMediaMetadata) -> Result<Self, Self::Error> {
        MediaMetadata::new(raw.tags, raw.streams, raw.chapters)
    }
}

impl MediaMetadata {
    /// Create validated metadata
    pub fn new(
        tags: Tags,
        streams: Vec<StreamMetadata>,
        chapters: Vec<Chapter>,
    ) -> Result<Self, DomainError> {
        rules::validate_stream_order(&streams)?;
        rules::validate_chapter_order(&chapters)?;
        Ok(Self {
            tags,
            streams,
            chapters,
        })
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn streams(&self) -> &[StreamMetadata] {
        &self.streams
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Look up a stream by its container index
    pub fn stream(&self, index: u32) -> Option<&StreamMetadata> {
        self.streams.iter().find(|s| s.index == index)
    }

    /// Replace the global tag mapping
    pub fn set_tags(&mut self, tags: Tags) {
        self.tags = tags;
    }

    /// Replace the chapter list, keeping the current one if the new list is invalid
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) -> Result<(), DomainError> {
        rules::validate_chapter_order(&chapters)?;
        self.chapters = chapters;
        Ok(())
    }

    /// Append a chapter after the last one
    pub fn push_chapter(&mut self, chapter: Chapter) -> Result<(), DomainError> {
        rules::check_chapter_fits(&self.chapters, None, &chapter)?;
        self.chapters.push(chapter);
        Ok(())
    }

    /// Check that the metadata can be handed to the muxer
    pub fn ensure_complete(&self) -> Result<(), DomainError> {
        rules::validate_chapter_titles(&self.chapters)
    }

    /// Serialize to the JSON interchange format
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Serialization(format!("JSON encoding failed: {}", e)))
    }

    /// Parse and validate the JSON interchange format
    pub fn from_json(content: &str) -> Result<Self, DomainError> {
        serde_json::from_str(content)
            .map_err(|e| DomainError::Serialization(format!("Invalid metadata JSON: {}", e)))
    }
}
