//! FFmpeg execution adapter
//!
//! Writes the exchange document to a temporary file and remuxes the media
//! with stream copy, taking every tag and chapter from that document.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ffmetadata::serialize_for_apply;
use crate::ports::*;

/// FFmpeg-based apply adapter
pub struct FFmpegAdapter {
    program: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter running the given executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the argument list for one remux.
    ///
    /// Input 1 is the exchange document; its k-th `[STREAM]` section is
    /// mapped onto the stream whose container index is `streams()[k].index`.
    pub fn build_args(
        media_path: &Path,
        metadata_path: &Path,
        metadata: &MediaMetadata,
        output_path: &Path,
        overwrite: bool,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            media_path.into(),
            "-f".into(),
            "ffmetadata".into(),
            "-i".into(),
            metadata_path.into(),
            "-map".into(),
            "0".into(),
            "-map_metadata".into(),
            "1".into(),
        ];

        for (k, stream) in metadata.streams().iter().enumerate() {
            args.push(format!("-map_metadata:s:{}", stream.index).into());
            args.push(format!("1:s:{}", k).into());
        }

        args.push("-map_chapters".into());
        args.push("1".into());
        args.push("-codec".into());
        args.push("copy".into());
        args.push(if overwrite { "-y" } else { "-n" }.into());
        args.push(output_path.into());
        args
    }

    fn write_document(metadata: &MediaMetadata) -> Result<tempfile::NamedTempFile, DomainError> {
        let mut file = tempfile::Builder::new()
            .prefix("ffmeta-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| DomainError::FsFail(format!("Failed to create temporary file: {}", e)))?;
        file.write_all(serialize_for_apply(metadata).as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| DomainError::FsFail(format!("Failed to write temporary file: {}", e)))?;
        Ok(file)
    }
}

fn render_command(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

#[async_trait]
impl ApplyPort for FFmpegAdapter {
    async fn apply(
        &self,
        media_path: &Path,
        metadata: &MediaMetadata,
        output_path: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, DomainError> {
        let document = Self::write_document(metadata)?;
        let existed = output_path.exists();
        let args = Self::build_args(media_path, document.path(), metadata, output_path, overwrite);
        debug!("Running {}", render_command(&self.program, &args));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                DomainError::tool_failed(&self.program, None, format!("could not be started: {}", e))
            })?;

        if !output.status.success() {
            if !existed && output_path.exists() {
                if let Err(e) = std::fs::remove_file(output_path) {
                    warn!("Failed to remove partial output {}: {}", output_path.display(), e);
                }
            }
            return Err(DomainError::tool_failed(
                &self.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        info!("Wrote {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}
