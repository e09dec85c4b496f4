//! Decodes exchange documents
//!
//! Used by `apply` to accept hand-written or previously exported
//! documents, and by the tests to check what the writer produced.

use super::{CHAPTER_SECTION, STREAM_SECTION};
use crate::domain::errors::DomainError;
use crate::domain::model::{Chapter, CodecType, MediaMetadata, StreamMetadata, Tags};
use crate::utils::time::Timebase;

/// One `[CHAPTER]` section with offsets in its own time base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeChapter {
    pub timebase: Timebase,
    pub start: u64,
    pub end: u64,
    pub tags: Tags,
}

/// Sections of a decoded document, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeDocument {
    pub global: Tags,
    pub streams: Vec<Tags>,
    pub chapters: Vec<ExchangeChapter>,
}

/// A logical line: characters paired with whether they were escaped
type Line = Vec<(char, bool)>;

fn split_lines(content: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::new();
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push((next, true));
                }
            }
            '\n' | '\r' => lines.push(std::mem::take(&mut current)),
            _ => current.push((c, false)),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn plain_text(line: &[(char, bool)]) -> String {
    line.iter().map(|(c, _)| *c).collect()
}

fn is_skipped(line: &[(char, bool)]) -> bool {
    match line.first() {
        None => true,
        Some((c, escaped)) => !escaped && (*c == ';' || *c == '#'),
    }
}

/// Split at the first unescaped `=`
fn split_pair(line: &[(char, bool)]) -> Option<(String, String)> {
    let at = line.iter().position(|(c, escaped)| *c == '=' && !escaped)?;
    Some((plain_text(&line[..at]), plain_text(&line[at + 1..])))
}

enum Section {
    Global,
    Stream,
    Chapter(PendingChapter),
}

#[derive(Default)]
struct PendingChapter {
    number: usize,
    timebase: Option<Timebase>,
    start: Option<u64>,
    end: Option<u64>,
    tags: Tags,
}

impl PendingChapter {
    fn finish(self) -> Result<ExchangeChapter, DomainError> {
        let start = self.start.ok_or_else(|| {
            DomainError::Serialization(format!("chapter section {} has no START", self.number))
        })?;
        let end = self.end.ok_or_else(|| {
            DomainError::Serialization(format!("chapter section {} has no END", self.number))
        })?;
        Ok(ExchangeChapter {
            timebase: self.timebase.unwrap_or(Timebase::MILLIS),
            start,
            end,
            tags: self.tags,
        })
    }
}

fn parse_ticks(number: usize, key: &str, value: &str) -> Result<u64, DomainError> {
    value.trim().parse::<u64>().map_err(|_| {
        DomainError::Serialization(format!(
            "chapter section {} has invalid {} '{}'",
            number, key, value
        ))
    })
}

/// Decode an exchange document into its sections
pub fn parse_exchange(content: &str) -> Result<ExchangeDocument, DomainError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut lines = split_lines(content).into_iter();

    let header = lines.next().map(|l| plain_text(&l)).unwrap_or_default();
    if !header.trim().to_ascii_uppercase().starts_with(";FFMETADATA") {
        return Err(DomainError::Serialization(
            "missing ;FFMETADATA1 header".to_string(),
        ));
    }

    let mut document = ExchangeDocument::default();
    let mut section = Section::Global;
    let mut chapter_count = 0;

    for (offset, line) in lines.enumerate() {
        let line_number = offset + 2;
        if is_skipped(&line) {
            continue;
        }

        let text = plain_text(&line);
        let unescaped_header = line.iter().all(|(_, escaped)| !escaped);
        if unescaped_header && text.trim() == STREAM_SECTION {
            if let Section::Chapter(pending) = std::mem::replace(&mut section, Section::Stream) {
                document.chapters.push(pending.finish()?);
            }
            document.streams.push(Tags::new());
            continue;
        }
        if unescaped_header && text.trim() == CHAPTER_SECTION {
            chapter_count += 1;
            let next = Section::Chapter(PendingChapter {
                number: chapter_count,
                ..Default::default()
            });
            if let Section::Chapter(pending) = std::mem::replace(&mut section, next) {
                document.chapters.push(pending.finish()?);
            }
            continue;
        }
        if unescaped_header
            && split_pair(&line).is_none()
            && text.starts_with('[')
            && text.trim_end().ends_with(']')
        {
            return Err(DomainError::Serialization(format!(
                "line {}: unknown section {}",
                line_number,
                text.trim()
            )));
        }

        let (key, value) = split_pair(&line).ok_or_else(|| {
            DomainError::Serialization(format!("line {} is not a key=value pair", line_number))
        })?;

        match &mut section {
            Section::Global => {
                document.global.insert(key, value);
            }
            Section::Stream => {
                if let Some(tags) = document.streams.last_mut() {
                    tags.insert(key, value);
                }
            }
            Section::Chapter(pending) => match key.to_ascii_uppercase().as_str() {
                "TIMEBASE" => {
                    let timebase = Timebase::parse(&value).map_err(|_| {
                        DomainError::Serialization(format!(
                            "chapter section {} has invalid TIMEBASE '{}'",
                            pending.number, value
                        ))
                    })?;
                    pending.timebase = Some(timebase);
                }
                "START" => pending.start = Some(parse_ticks(pending.number, "START", &value)?),
                "END" => pending.end = Some(parse_ticks(pending.number, "END", &value)?),
                _ => {
                    pending.tags.insert(key, value);
                }
            },
        }
    }

    if let Section::Chapter(pending) = section {
        document.chapters.push(pending.finish()?);
    }

    Ok(document)
}

impl ExchangeDocument {
    /// Convert into the metadata model.
    ///
    /// The document does not name its streams, so the k-th `[STREAM]`
    /// section becomes a stream with index k and an unknown codec type.
    pub fn into_metadata(self) -> Result<MediaMetadata, DomainError> {
        let streams = self
            .streams
            .into_iter()
            .enumerate()
            .map(|(k, tags)| StreamMetadata::with_tags(k as u32, CodecType::Unknown, tags))
            .collect();

        let chapters = self
            .chapters
            .into_iter()
            .enumerate()
            .map(|(position, c)| {
                let offset = |ticks| {
                    c.timebase.ticks_to_timestamp(ticks).map_err(|e| {
                        DomainError::Serialization(format!("chapter section {}: {}", position + 1, e))
                    })
                };
                Chapter::with_tags(offset(c.start)?, offset(c.end)?, c.tags)
            })
            .collect::<Result<Vec<_>, _>>()?;

        MediaMetadata::new(self.global, streams, chapters)
    }
}
