// Domain rules - Invariants over chapters, streams and tag values

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::domain::errors::*;
use crate::domain::model::*;

#[cfg(test)]
mod tests;

/// Streams must be listed in strictly ascending container index order
pub fn validate_stream_order(streams: &[StreamMetadata]) -> Result<(), DomainError> {
    for pair in streams.windows(2) {
        if pair[1].index <= pair[0].index {
            return Err(DomainError::Validation(format!(
                "stream index {} listed after stream index {}",
                pair[1].index, pair[0].index
            )));
        }
    }
    Ok(())
}

/// Chapters must be sorted by start and must not overlap
pub fn validate_chapter_order(chapters: &[Chapter]) -> Result<(), DomainError> {
    for (i, pair) in chapters.windows(2).enumerate() {
        let (previous, next) = (&pair[0], &pair[1]);
        if next.start() < previous.start() {
            return Err(DomainError::Validation(format!(
                "chapter {} starts at {} before chapter {} at {}",
                i + 2,
                next.start(),
                i + 1,
                previous.start()
            )));
        }
        if next.start() < previous.end() {
            return Err(DomainError::Validation(format!(
                "chapter {} starting at {} overlaps chapter {} ending at {}",
                i + 2,
                next.start(),
                i + 1,
                previous.end()
            )));
        }
    }
    Ok(())
}

/// Check that a candidate chapter can follow `accepted` and, when given, precede `next`
pub fn check_chapter_fits(
    accepted: &[Chapter],
    next: Option<&Chapter>,
    candidate: &Chapter,
) -> Result<(), DomainError> {
    if let Some(previous) = accepted.last() {
        if candidate.start() < previous.end() {
            return Err(DomainError::Validation(format!(
                "chapter must start at or after {} where the previous chapter '{}' ends",
                previous.end(),
                previous.title()
            )));
        }
    }
    if let Some(next) = next {
        if candidate.end() > next.start() {
            return Err(DomainError::Validation(format!(
                "chapter must end at or before {} where the next chapter '{}' starts",
                next.start(),
                next.title()
            )));
        }
    }
    Ok(())
}

/// Keys the exchange format reads as chapter timing rather than as tags
pub const RESERVED_CHAPTER_KEYS: [&str; 3] = ["TIMEBASE", "START", "END"];

pub fn is_reserved_chapter_key(key: &str) -> bool {
    RESERVED_CHAPTER_KEYS.iter().any(|r| r.eq_ignore_ascii_case(key))
}

/// Chapter tags must not use a timing key
pub fn validate_chapter_tags(tags: &Tags) -> Result<(), DomainError> {
    match tags.keys().find(|key| is_reserved_chapter_key(key)) {
        Some(key) => Err(DomainError::Validation(format!(
            "chapter tag '{}' is reserved for chapter timing",
            key
        ))),
        None => Ok(()),
    }
}

/// Every chapter needs a non-empty title before it can be written
pub fn validate_chapter_titles(chapters: &[Chapter]) -> Result<(), DomainError> {
    for (i, chapter) in chapters.iter().enumerate() {
        if chapter.title().trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "chapter {} ({} - {}) has no title",
                i + 1,
                chapter.start(),
                chapter.end()
            )));
        }
    }
    Ok(())
}

/// Check applied to a tag value entered by the user
#[derive(Debug, Clone)]
pub enum TagValidator {
    /// Value must match the regular expression
    Pattern(Regex),
    /// Value must be one of the listed choices
    Choice(Vec<String>),
    /// Value must parse with the `chrono` format string
    DateFormat(String),
    /// Value must not exceed the character count
    MaxLength(usize),
}

impl TagValidator {
    /// Build a pattern validator; the pattern is anchored at both ends
    pub fn pattern(pattern: &str) -> Result<Self, DomainError> {
        let anchored = format!("^(?:{})$", pattern.trim_start_matches('^').trim_end_matches('$'));
        Regex::new(&anchored)
            .map(TagValidator::Pattern)
            .map_err(|e| DomainError::BadArgs(format!("Invalid pattern '{}': {}", pattern, e)))
    }

    pub fn choice(choices: &[&str]) -> Self {
        TagValidator::Choice(choices.iter().map(|c| c.to_string()).collect())
    }

    pub fn validate(&self, value: &str) -> Result<(), DomainError> {
        match self {
            TagValidator::Pattern(regex) => {
                if regex.is_match(value) {
                    Ok(())
                } else {
                    Err(DomainError::Validation(format!(
                        "'{}' does not match pattern {}",
                        value,
                        regex.as_str()
                    )))
                }
            }
            TagValidator::Choice(choices) => {
                if choices.iter().any(|c| c == value) {
                    Ok(())
                } else {
                    Err(DomainError::Validation(format!(
                        "'{}' is not a valid choice, available are {}",
                        value,
                        choices.join(", ")
                    )))
                }
            }
            TagValidator::DateFormat(format) => {
                let parsed = NaiveDateTime::parse_from_str(value, format).is_ok()
                    || NaiveDate::parse_from_str(value, format).is_ok();
                if parsed {
                    Ok(())
                } else {
                    Err(DomainError::Validation(format!(
                        "'{}' does not match date format {}",
                        value, format
                    )))
                }
            }
            TagValidator::MaxLength(max) => {
                if value.chars().count() <= *max {
                    Ok(())
                } else {
                    Err(DomainError::Validation(format!(
                        "value is longer than {} characters",
                        max
                    )))
                }
            }
        }
    }
}

/// Run every validator, collecting all failure messages
pub fn validate_tag_value(validators: &[TagValidator], value: &str) -> Result<(), DomainError> {
    let failures: Vec<String> = validators
        .iter()
        .filter_map(|v| v.validate(value).err())
        .map(|e| match e {
            DomainError::Validation(msg) => msg,
            other => other.to_string(),
        })
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(failures.join("; ")))
    }
}
