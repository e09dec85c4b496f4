//! Raw ffprobe output and its mapping into the metadata model
//!
//! The types here mirror the JSON printed by
//! `ffprobe -print_format json -show_format -show_streams -show_chapters`.
//! Every field is optional so that missing data surfaces as a
//! [`DomainError::MalformedProbeData`](crate::domain::errors::DomainError)
//! from [`MediaMetadata::from_probe_result`](crate::domain::model::MediaMetadata)
//! rather than as a serde error.

use serde::Deserialize;

use crate::domain::errors::DomainError;
use crate::domain::model::Tags;

pub mod mapper;

/// Top-level ffprobe document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeOutput {
    pub format: Option<ProbeFormat>,
    pub streams: Option<Vec<ProbeStream>>,
    pub chapters: Option<Vec<ProbeChapter>>,
}

/// Container-level section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    pub filename: Option<String>,
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub tags: Option<Tags>,
}

/// One entry of the stream list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    pub index: Option<u32>,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub tags: Option<Tags>,
}

/// One entry of the chapter list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeChapter {
    pub id: Option<i64>,
    pub time_base: Option<String>,
    pub start: Option<i64>,
    pub start_time: Option<String>,
    pub end: Option<i64>,
    pub end_time: Option<String>,
    pub tags: Option<Tags>,
}

impl ProbeOutput {
    /// Decode the probe tool's stdout
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| {
            DomainError::MalformedProbeData(format!("ffprobe output is not valid JSON: {}", e))
        })
    }
}
