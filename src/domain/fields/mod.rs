// Field definitions - Known tags and the required/optional sets driving edit prompts

use crate::domain::errors::DomainError;
use crate::domain::model::TITLE_KEY;
use crate::domain::rules::{validate_tag_value, TagValidator};

/// Describes a tag the edit workflow knows how to prompt for
#[derive(Debug, Clone)]
pub struct TagDefinition {
    pub key: String,
    pub label: String,
    pub description: String,
    pub examples: Vec<String>,
    pub validators: Vec<TagValidator>,
    /// Key the muxer expects when it differs from the key probing reports
    pub write_key: Option<String>,
}

impl TagDefinition {
    pub fn new(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            examples: Vec::new(),
            validators: Vec::new(),
            write_key: None,
        }
    }

    /// Definition for a key that is not in the catalogue
    pub fn custom(key: &str) -> Self {
        Self::new(key, key, "")
    }

    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_validator(mut self, validator: TagValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_write_key(mut self, write_key: &str) -> Self {
        self.write_key = Some(write_key.to_string());
        self
    }

    pub fn validate(&self, value: &str) -> Result<(), DomainError> {
        validate_tag_value(&self.validators, value)
    }
}

fn pattern(p: &str) -> TagValidator {
    // catalogue patterns are literals, a failure here is a programming error caught by tests
    TagValidator::pattern(p).unwrap_or(TagValidator::MaxLength(usize::MAX))
}

/// Tags recognised by FFmpeg muxers, following the Kodi video tagging conventions
pub fn tag_catalog() -> Vec<TagDefinition> {
    vec![
        TagDefinition::new("title", "Title", "Title of the content"),
        TagDefinition::new("artist", "Artist Name", "Name of the artist"),
        TagDefinition::new("album_artist", "Album Artist", "Name of the album artist"),
        TagDefinition::new("album", "Album Title", "Name of the album"),
        TagDefinition::new("sort_album", "Sorting Album Title", "Name of the album to use for sorting")
            .with_write_key("album-sort"),
        TagDefinition::new(
            "sort_artist",
            "Sorting Artist Name",
            "Name of the artist to use for sorting",
        )
        .with_write_key("artist-sort"),
        TagDefinition::new("sort_name", "Sorting Title", "Title of the content to use for sorting")
            .with_write_key("title-sort"),
        TagDefinition::new("subtitle", "Subtitle", "Subtitle of the content"),
        TagDefinition::new("comment", "Comment", "General comments"),
        TagDefinition::new(
            "compliation",
            "Compliation",
            "Name of the compliation the content is a part of",
        ),
        TagDefinition::new("grouping", "Grouping", "The name of the group this content belongs to"),
        TagDefinition::new("lyrics", "Lyrics", "Unsynchronized lyrics"),
        TagDefinition::new("copyright", "Copyright", "Copyright information"),
        TagDefinition::new(
            "creation_time",
            "Encoded Time",
            "Datetime when the content was encoded",
        )
        .with_examples(&["2021-06-01 12:30:00"])
        .with_validator(TagValidator::DateFormat("%Y-%m-%d %H:%M:%S".to_string())),
        TagDefinition::new("date", "Release Date", "The date the content was released")
            .with_validator(TagValidator::DateFormat("%Y-%m-%d".to_string())),
        TagDefinition::new("year", "Release Year", "The year the content was released")
            .with_validator(pattern(r"\d{4}")),
        TagDefinition::new("description", "Description", "Long description of the content"),
        TagDefinition::new("synopsis", "Synopsis", "Short description of the content")
            .with_validator(TagValidator::MaxLength(240)),
        TagDefinition::new("genre", "Genre", "The genre of the content")
            .with_examples(&["Documentary", "Drama", "Comedy"]),
        TagDefinition::new(
            "language",
            "Language",
            "Language of the original/displayed content (ISO 639)",
        )
        .with_examples(&["eng", "jpn", "fra"])
        .with_validator(pattern(r"[A-Za-z]{2,3}")),
        TagDefinition::new("show", "Show", "The name of the show the episode belongs to"),
        TagDefinition::new("season_number", "Season Number", "The season number of a show")
            .with_validator(pattern(r"\d+")),
        TagDefinition::new(
            "episode_sort",
            "Episode Number",
            "The episode number within the season",
        )
        .with_validator(pattern(r"\d+")),
        TagDefinition::new("episode_id", "Episode ID", "The unique ID of the episode"),
        TagDefinition::new("network", "Network", "The name of the network who owns the content"),
        TagDefinition::new("director", "Director", "The name of a director"),
        TagDefinition::new("producer", "Producer", "The name of a producer"),
        TagDefinition::new("performer", "Performer", "The name of a performer"),
        TagDefinition::new("composer", "Composer", "The name of a composer"),
        TagDefinition::new("publisher", "Publisher", "The name of a publisher"),
        TagDefinition::new("track", "Track", "The track identifier for the content")
            .with_examples(&["Track Number / Total Tracks"])
            .with_validator(pattern(r"\d+/\d+")),
        TagDefinition::new("disc", "Disc", "The disc identifier for the content")
            .with_examples(&["Disc Number / Total Discs"])
            .with_validator(pattern(r"\d+/\d+")),
        TagDefinition::new("rating", "Advisory Rating", "A flag used to mark explicit content")
            .with_examples(&["0 = None", "1 = Clean", "2 = Explicit"])
            .with_validator(TagValidator::choice(&["0", "1", "2"])),
        TagDefinition::new("hd_video", "Video Quality", "General quality of a video")
            .with_examples(&["0 = SD", "1 = 720p", "2 = 1080p", "3 = 2160p"])
            .with_validator(TagValidator::choice(&["0", "1", "2", "3"])),
        TagDefinition::new("media_type", "Media Type", "The type of the content")
            .with_examples(&["TV Show", "Movie", "Music Video"]),
        TagDefinition::new("location", "Location", "GPS coordinates related to the content")
            .with_examples(&["+90.0,-127.554334", "45,180"])
            .with_validator(pattern(r"[-+]?\d+(\.\d*)?,\s*[-+]?\d+(\.\d*)?")),
        TagDefinition::new("keywords", "Keywords", "Generic keywords separated by commas"),
        TagDefinition::new("URL", "URL", "A URL that is related to the content"),
        TagDefinition::new(
            "podcast",
            "Podcast Flag",
            "A flag that indicates if some audio content is a podcast",
        )
        .with_examples(&["0 = Not Podcast", "1 = Is Podcast"])
        .with_validator(TagValidator::choice(&["0", "1"])),
        TagDefinition::new(
            "category",
            "Podcast Category",
            "The name of the category the podcast belongs to",
        ),
        TagDefinition::new("episode_uid", "Podcast Episode", "The unique ID for the podcast episode"),
        TagDefinition::new("encoder", "Encoder", "Name of the software used for encoding"),
        TagDefinition::new(
            "encoded_by",
            "Encoded By",
            "Name of the person or company who encoded the content",
        ),
    ]
}

/// Look up a catalogue entry by key, ignoring case
pub fn find_definition(key: &str) -> Option<TagDefinition> {
    tag_catalog()
        .into_iter()
        .find(|d| d.key.eq_ignore_ascii_case(key))
}

/// Key to write a global tag under, when the muxer spells it differently
pub fn write_key_for(key: &str) -> Option<String> {
    find_definition(key).and_then(|definition| definition.write_key)
}

/// What an edit session operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Tags,
    Chapters,
}

/// Required and optional fields for one edit target
#[derive(Debug, Clone)]
pub struct EditSpecification {
    pub target: EditTarget,
    pub required: Vec<TagDefinition>,
    pub optional: Vec<TagDefinition>,
}

impl EditSpecification {
    /// Build the tag specification from configured key lists
    pub fn for_tags(required: &[String], suggested: &[String]) -> Result<Self, DomainError> {
        let mut required_defs: Vec<TagDefinition> = Vec::new();
        for key in required {
            let key = key.trim();
            if key.is_empty() {
                return Err(DomainError::BadArgs("Required tag keys cannot be empty".to_string()));
            }
            if required_defs.iter().any(|d| d.key.eq_ignore_ascii_case(key)) {
                continue;
            }
            required_defs.push(find_definition(key).unwrap_or_else(|| TagDefinition::custom(key)));
        }

        let optional = suggested
            .iter()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .filter(|key| !required_defs.iter().any(|d| d.key.eq_ignore_ascii_case(key)))
            .map(|key| find_definition(key).unwrap_or_else(|| TagDefinition::custom(key)))
            .collect();

        Ok(Self {
            target: EditTarget::Tags,
            required: required_defs,
            optional,
        })
    }

    /// Chapters always require a title; description is the common extra tag
    pub fn for_chapters() -> Self {
        Self {
            target: EditTarget::Chapters,
            required: vec![TagDefinition::new(TITLE_KEY, "Chapter Title", "Name of the chapter")],
            optional: vec![TagDefinition::new(
                "description",
                "Chapter Description",
                "Short description of the chapter",
            )],
        }
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|d| d.key.eq_ignore_ascii_case(key))
    }

    /// Definition for a key: from this specification, the catalogue, or a bare custom one
    pub fn definition_for(&self, key: &str) -> TagDefinition {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|d| d.key.eq_ignore_ascii_case(key))
            .cloned()
            .or_else(|| find_definition(key))
            .unwrap_or_else(|| TagDefinition::custom(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_patterns_compile() {
        for definition in tag_catalog() {
            for validator in &definition.validators {
                if let TagValidator::MaxLength(max) = validator {
                    assert_ne!(*max, usize::MAX, "pattern for {} failed to compile", definition.key);
                }
            }
        }
    }

    #[test]
    fn test_for_tags_dedupes_and_uses_catalog() {
        let spec = EditSpecification::for_tags(
            &["Title".to_string(), "title".to_string(), "mood".to_string()],
            &["genre".to_string(), "title".to_string()],
        )
        .unwrap();

        assert_eq!(spec.target, EditTarget::Tags);
        assert_eq!(spec.required.len(), 2);
        assert_eq!(spec.required[0].label, "Title");
        assert_eq!(spec.required[1].key, "mood");
        assert_eq!(spec.optional.len(), 1);
        assert_eq!(spec.optional[0].key, "genre");
    }

    #[test]
    fn test_for_tags_rejects_blank_required_key() {
        assert!(EditSpecification::for_tags(&["  ".to_string()], &[]).is_err());
    }

    #[test]
    fn test_definition_for_falls_back_to_catalog() {
        let spec = EditSpecification::for_chapters();
        assert!(spec.is_required("TITLE"));
        assert!(!spec.definition_for("rating").validators.is_empty());
        assert!(spec.definition_for("unheard_of").validators.is_empty());
    }

    #[test]
    fn test_sort_keys_have_write_aliases() {
        assert_eq!(write_key_for("sort_album").as_deref(), Some("album-sort"));
        assert_eq!(write_key_for("SORT_ARTIST").as_deref(), Some("artist-sort"));
        assert_eq!(write_key_for("sort_name").as_deref(), Some("title-sort"));
        assert_eq!(write_key_for("album"), None);
        assert_eq!(write_key_for("unheard_of"), None);
    }

    #[test]
    fn test_podcast_flag_choices() {
        let podcast = find_definition("podcast").unwrap();
        assert!(podcast.validate("1").is_ok());
        assert!(podcast.validate("2").is_err());
        assert!(find_definition("url").is_some());
    }

    #[test]
    fn test_rating_validator() {
        let rating = find_definition("rating").unwrap();
        assert!(rating.validate("1").is_ok());
        assert!(rating.validate("5").is_err());
    }
}
