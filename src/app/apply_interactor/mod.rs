// Apply interactor - Writes metadata into a copy of a media file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ffmetadata::{is_exchange_document, parse_exchange, serialize_for_apply};
use crate::ports::*;
use crate::utils::path::resolve_output_path;

/// Request for writing metadata
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub media_path: PathBuf,
    pub metadata: MediaMetadata,
    pub output_path: Option<PathBuf>,
    pub overwrite: bool,
    pub dry_run: bool,
}

/// Result of an apply request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The new media file was written
    Written(PathBuf),
    /// Nothing was run; the exchange document that would have been used
    DryRun { output_path: PathBuf, document: String },
}

/// Interactor for the apply use case
pub struct ApplyInteractor {
    apply_port: Arc<dyn ApplyPort>,
}

impl ApplyInteractor {
    /// Create new apply interactor with injected ports
    pub fn new(apply_port: Arc<dyn ApplyPort>) -> Self {
        Self { apply_port }
    }

    /// Check the input and pick the output path without writing anything
    pub fn prepare(
        &self,
        media_path: &Path,
        output_path: Option<&Path>,
        overwrite: bool,
    ) -> Result<PathBuf, DomainError> {
        if !media_path.is_file() {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                media_path.display()
            )));
        }
        resolve_output_path(media_path, output_path, overwrite)
    }

    /// Execute apply
    pub async fn execute(&self, request: ApplyRequest) -> Result<ApplyOutcome, DomainError> {
        request.metadata.ensure_complete()?;
        let output_path = self.prepare(
            &request.media_path,
            request.output_path.as_deref(),
            request.overwrite,
        )?;

        if request.dry_run {
            debug!("Dry run, not writing {}", output_path.display());
            return Ok(ApplyOutcome::DryRun {
                output_path,
                document: serialize_for_apply(&request.metadata),
            });
        }

        info!(
            "Applying metadata to {} -> {}",
            request.media_path.display(),
            output_path.display()
        );
        let written = self
            .apply_port
            .apply(
                &request.media_path,
                &request.metadata,
                &output_path,
                request.overwrite,
            )
            .await?;
        Ok(ApplyOutcome::Written(written))
    }
}

/// Load metadata from a JSON or exchange-format file
pub fn load_metadata_file(path: &Path) -> Result<MediaMetadata, DomainError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_metadata(&content)
}

/// Parse metadata, detecting the exchange format by its header
pub fn parse_metadata(content: &str) -> Result<MediaMetadata, DomainError> {
    if is_exchange_document(content) {
        parse_exchange(content)?.into_metadata()
    } else {
        MediaMetadata::from_json(content)
    }
}
