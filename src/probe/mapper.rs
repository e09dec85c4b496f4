//! Maps raw ffprobe output into [`MediaMetadata`]

use tracing::{debug, warn};

use super::{ProbeChapter, ProbeOutput};
use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::rules::is_reserved_chapter_key;
use crate::utils::time::{parse_seconds, Timebase};

impl MediaMetadata {
    /// Build the model from a probe result.
    ///
    /// Requires the format section with a parsable duration and the stream
    /// list. Chapters without usable start/end offsets are skipped; the
    /// remaining chapters are sorted and must not overlap.
    pub fn from_probe_result(raw: ProbeOutput) -> Result<Self, DomainError> {
        let format = raw
            .format
            .ok_or_else(|| DomainError::MalformedProbeData("missing format section".to_string()))?;

        let duration = format.duration.as_deref().ok_or_else(|| {
            DomainError::MalformedProbeData("format section has no duration".to_string())
        })?;
        let duration = parse_seconds(duration).map_err(|e| {
            DomainError::MalformedProbeData(format!("unparsable duration '{}': {}", duration, e))
        })?;
        debug!(
            "Probed {} ({}), duration {}",
            format.filename.as_deref().unwrap_or("<unknown>"),
            format.format_name.as_deref().unwrap_or("unknown format"),
            duration
        );

        let raw_streams = raw
            .streams
            .ok_or_else(|| DomainError::MalformedProbeData("missing stream list".to_string()))?;

        let tags: Tags = format
            .tags
            .unwrap_or_default()
            .iter()
            .map(|(key, value)| (key.to_lowercase(), value.to_string()))
            .collect();

        let mut streams = Vec::with_capacity(raw_streams.len());
        for (position, stream) in raw_streams.into_iter().enumerate() {
            let index = stream.index.ok_or_else(|| {
                DomainError::MalformedProbeData(format!("stream at position {} has no index", position))
            })?;
            let codec_type = stream
                .codec_type
                .as_deref()
                .map(CodecType::from_probe_name)
                .unwrap_or(CodecType::Unknown);
            streams.push(StreamMetadata::with_tags(
                index,
                codec_type,
                stream.tags.unwrap_or_default(),
            ));
        }
        streams.sort_by_key(|s| s.index);

        let mut chapters = Vec::new();
        for (position, chapter) in raw.chapters.unwrap_or_default().into_iter().enumerate() {
            if let Some(chapter) = map_chapter(position, chapter)? {
                chapters.push(chapter);
            }
        }
        chapters.sort_by_key(|c| c.start());

        MediaMetadata::new(tags, streams, chapters)
            .map_err(|e| DomainError::MalformedProbeData(e.to_string()))
    }
}

fn map_chapter(position: usize, chapter: ProbeChapter) -> Result<Option<Chapter>, DomainError> {
    let start = chapter_offset(position, "start", &chapter.start_time, chapter.start, &chapter.time_base)?;
    let end = chapter_offset(position, "end", &chapter.end_time, chapter.end, &chapter.time_base)?;

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!("Chapter at index {} has no start or end time, skipping chapter", position);
            return Ok(None);
        }
    };

    let mut tags = chapter.tags.unwrap_or_default();
    let reserved: Vec<String> = tags
        .keys()
        .filter(|key| is_reserved_chapter_key(key))
        .map(str::to_string)
        .collect();
    for key in reserved {
        warn!("Chapter at index {} has a tag named {}, dropping it", position, key);
        tags.remove(&key);
    }

    match Chapter::with_tags(start, end, tags) {
        Ok(chapter) => Ok(Some(chapter)),
        Err(e) => {
            warn!("Chapter at index {} is empty ({}), skipping chapter", position, e);
            Ok(None)
        }
    }
}

/// Prefer the decimal `*_time` field, falling back to ticks in the chapter's time base
fn chapter_offset(
    position: usize,
    name: &str,
    seconds: &Option<String>,
    ticks: Option<i64>,
    time_base: &Option<String>,
) -> Result<Option<Timestamp>, DomainError> {
    if let Some(seconds) = seconds {
        return parse_seconds(seconds).map(Some).map_err(|e| {
            DomainError::MalformedProbeData(format!(
                "chapter {} has unparsable {} time '{}': {}",
                position, name, seconds, e
            ))
        });
    }

    match (ticks, time_base) {
        (Some(ticks), Some(time_base)) => {
            let timebase = Timebase::parse(time_base)
                .map_err(|e| DomainError::MalformedProbeData(format!("chapter {}: {}", position, e)))?;
            let ticks = u64::try_from(ticks).map_err(|_| {
                DomainError::MalformedProbeData(format!("chapter {} has negative {} offset", position, name))
            })?;
            timebase
                .ticks_to_timestamp(ticks)
                .map(Some)
                .map_err(|e| DomainError::MalformedProbeData(format!("chapter {}: {}", position, e)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 1, "codec_type": "audio", "codec_name": "aac", "tags": {"language": "eng"}},
            {"index": 0, "codec_type": "video", "codec_name": "h264"}
        ],
        "chapters": [
            {"id": 1, "time_base": "1/1000", "start": 60000, "start_time": "60.000000",
             "end": 120000, "end_time": "120.000000", "tags": {"title": "Body"}},
            {"id": 0, "time_base": "1/1000", "start": 0, "start_time": "0.000000",
             "end": 60000, "end_time": "60.000000", "tags": {"title": "Intro"}}
        ],
        "format": {
            "filename": "movie.mkv",
            "format_name": "matroska,webm",
            "duration": "120.000000",
            "tags": {"TITLE": "Foo", "ENCODER": "Lavf60.3.100"}
        }
    }"#;

    fn probe(json: &str) -> Result<MediaMetadata, DomainError> {
        let raw: ProbeOutput = serde_json::from_str(json).unwrap();
        MediaMetadata::from_probe_result(raw)
    }

    #[test]
    fn test_maps_full_probe_output() {
        let metadata = probe(SAMPLE).unwrap();

        assert_eq!(metadata.tags().get("title"), Some("Foo"));
        assert_eq!(metadata.tags().keys().collect::<Vec<_>>(), vec!["title", "encoder"]);

        assert_eq!(metadata.streams().len(), 2);
        assert_eq!(metadata.streams()[0].index, 0);
        assert_eq!(metadata.streams()[0].codec_type, CodecType::Video);
        assert_eq!(metadata.streams()[1].tags.get("language"), Some("eng"));

        let titles: Vec<_> = metadata.chapters().iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Intro", "Body"]);
        assert_eq!(metadata.chapters()[1].end(), Timestamp::from_secs(120));
    }

    #[test]
    fn test_missing_format_is_malformed() {
        let err = probe(r#"{"streams": []}"#).unwrap_err();
        assert!(matches!(err, DomainError::MalformedProbeData(_)));
    }

    #[test]
    fn test_missing_duration_is_malformed() {
        let err = probe(r#"{"format": {}, "streams": []}"#).unwrap_err();
        assert!(matches!(err, DomainError::MalformedProbeData(_)));
    }

    #[test]
    fn test_unparsable_duration_is_malformed() {
        let err = probe(r#"{"format": {"duration": "N/A"}, "streams": []}"#).unwrap_err();
        assert!(matches!(err, DomainError::MalformedProbeData(_)));
    }

    #[test]
    fn test_missing_streams_is_malformed() {
        let err = probe(r#"{"format": {"duration": "1.0"}}"#).unwrap_err();
        assert!(matches!(err, DomainError::MalformedProbeData(_)));
    }

    #[test]
    fn test_chapter_without_times_is_skipped() {
        let metadata = probe(
            r#"{"format": {"duration": "10"}, "streams": [],
                "chapters": [{"id": 0, "tags": {"title": "Ghost"}},
                             {"id": 1, "start_time": "0.0", "end_time": "5.0"}]}"#,
        )
        .unwrap();
        assert_eq!(metadata.chapters().len(), 1);
        // chapters without a title tag still carry an empty one
        assert_eq!(metadata.chapters()[0].title(), "");
    }

    #[test]
    fn test_chapter_timing_tags_are_dropped() {
        let metadata = probe(
            r#"{"format": {"duration": "10"}, "streams": [],
                "chapters": [{"start_time": "0", "end_time": "5",
                              "tags": {"title": "A", "START": "beginning"}}]}"#,
        )
        .unwrap();
        let chapter = &metadata.chapters()[0];
        assert_eq!(chapter.title(), "A");
        assert!(!chapter.tags().contains_key("start"));
    }

    #[test]
    fn test_chapter_ticks_fallback() {
        let metadata = probe(
            r#"{"format": {"duration": "10"}, "streams": [],
                "chapters": [{"id": 0, "time_base": "1/90000", "start": 0, "end": 450000}]}"#,
        )
        .unwrap();
        assert_eq!(metadata.chapters()[0].end(), Timestamp::from_secs(5));
    }

    #[test]
    fn test_overlapping_probe_chapters_are_malformed() {
        let err = probe(
            r#"{"format": {"duration": "30"}, "streams": [],
                "chapters": [{"start_time": "0", "end_time": "10"},
                             {"start_time": "5", "end_time": "15"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::MalformedProbeData(_)));
    }

    #[test]
    fn test_unknown_codec_type() {
        let metadata = probe(
            r#"{"format": {"duration": "1"}, "streams": [{"index": 0, "codec_type": "attachment"}, {"index": 1}]}"#,
        )
        .unwrap();
        assert!(metadata.streams().iter().all(|s| s.codec_type == CodecType::Unknown));
    }
}
