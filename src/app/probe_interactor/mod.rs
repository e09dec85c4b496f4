// Probe interactor - Reads metadata and renders it for `probe` and `show`

use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ffmetadata::serialize_for_apply;
use crate::ports::*;

/// How probed metadata is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
    Ffmetadata,
}

/// Request for reading one file's metadata
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub media_path: PathBuf,
    pub format: OutputFormat,
}

/// Probed metadata together with its rendering
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub metadata: MediaMetadata,
    pub rendered: String,
}

/// Interactor for the probe and show use cases
pub struct ProbeInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl ProbeInteractor {
    /// Create new probe interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Probe without rendering
    pub async fn probe(&self, media_path: &Path) -> Result<MediaMetadata, DomainError> {
        info!("Probing {}", media_path.display());
        let metadata = self.probe_port.probe_media(media_path).await?;
        info!(
            "Found {} tags, {} streams, {} chapters",
            metadata.tags().len(),
            metadata.streams().len(),
            metadata.chapters().len()
        );
        Ok(metadata)
    }

    /// Execute probe and render the result
    pub async fn execute(&self, request: ProbeRequest) -> Result<ProbeResponse, DomainError> {
        let metadata = self.probe(&request.media_path).await?;
        let rendered = render(&request.media_path, &metadata, request.format)?;
        Ok(ProbeResponse { metadata, rendered })
    }
}

/// Render metadata in the requested format
pub fn render(
    media_path: &Path,
    metadata: &MediaMetadata,
    format: OutputFormat,
) -> Result<String, DomainError> {
    match format {
        OutputFormat::Json => metadata.to_json(),
        OutputFormat::Yaml => serde_yaml::to_string(metadata)
            .map_err(|e| DomainError::Serialization(format!("YAML encoding failed: {}", e))),
        OutputFormat::Ffmetadata => Ok(serialize_for_apply(metadata)),
        OutputFormat::Text => Ok(format_as_text(media_path, metadata)),
    }
}

fn format_tag_list(tags: &Tags) -> String {
    tags.iter()
        .map(|(key, value)| format!("{}={}", key, value.replace('\n', "\\n")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable listing of tags, streams and chapters
pub fn format_as_text(media_path: &Path, metadata: &MediaMetadata) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "File: {}", media_path.display());

    let _ = writeln!(output, "\nTags ({}):", metadata.tags().len());
    if metadata.tags().is_empty() {
        output.push_str("  (none)\n");
    }
    let width = metadata.tags().keys().map(str::len).max().unwrap_or(0);
    for (key, value) in metadata.tags().iter() {
        let _ = writeln!(output, "  {:<width$}  {}", key, value.replace('\n', "\\n"), width = width);
    }

    let _ = writeln!(output, "\nStreams ({}):", metadata.streams().len());
    for stream in metadata.streams() {
        let _ = write!(output, "  #{:<3} {:<8}", stream.index, stream.codec_type);
        if !stream.tags.is_empty() {
            let _ = write!(output, " {}", format_tag_list(&stream.tags));
        }
        output.push('\n');
    }

    let _ = writeln!(output, "\nChapters ({}):", metadata.chapters().len());
    for (i, chapter) in metadata.chapters().iter().enumerate() {
        let title = if chapter.title().is_empty() {
            "(untitled)"
        } else {
            chapter.title()
        };
        let _ = write!(
            output,
            "  {:>3}. {} - {}  {}",
            i + 1,
            chapter.start(),
            chapter.end(),
            title
        );
        let extra: Tags = chapter.extra_tags().collect();
        if !extra.is_empty() {
            let _ = write!(output, " [{}]", format_tag_list(&extra));
        }
        output.push('\n');
    }

    output
}
