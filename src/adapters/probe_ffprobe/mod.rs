//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` once per file and maps its JSON report into the
//! metadata model.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::probe::ProbeOutput;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter running the given executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed before the media path
    pub fn probe_args() -> [&'static str; 8] {
        [
            "-hide_banner",
            "-loglevel",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            "-show_chapters",
        ]
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_media(&self, media_path: &Path) -> Result<MediaMetadata, DomainError> {
        if !media_path.is_file() {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                media_path.display()
            )));
        }

        debug!(
            "Running {} {} {}",
            self.program,
            Self::probe_args().join(" "),
            media_path.display()
        );

        let output = Command::new(&self.program)
            .args(Self::probe_args())
            .arg(media_path)
            .output()
            .await
            .map_err(|e| {
                DomainError::tool_failed(&self.program, None, format!("could not be started: {}", e))
            })?;

        if !output.status.success() {
            return Err(DomainError::tool_failed(
                &self.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        let raw = ProbeOutput::from_json_bytes(&output.stdout)?;
        MediaMetadata::from_probe_result(raw)
    }
}
