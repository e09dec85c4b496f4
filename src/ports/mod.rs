// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for reading metadata out of a media file
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe media file and return its tags, streams and chapters
    async fn probe_media(&self, media_path: &Path) -> Result<MediaMetadata, DomainError>;
}

/// Port for writing metadata into a copy of a media file
#[async_trait]
pub trait ApplyPort: Send + Sync {
    /// Remux `media_path` into `output_path` with `metadata` replacing the
    /// container's tags, stream tags and chapters
    async fn apply(
        &self,
        media_path: &Path,
        metadata: &MediaMetadata,
        output_path: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, DomainError>;
}

/// Port for interactive prompting during edit sessions
///
/// Every method that reads input returns [`DomainError::EditAborted`] when
/// the input is closed.
pub trait PromptPort {
    /// Ask for a value, offering `default` when the answer is blank
    fn read_value(&mut self, label: &str, default: Option<&str>) -> Result<String, DomainError>;

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, DomainError>;

    /// Tell the user an answer was rejected
    fn warn(&mut self, message: &str);

    /// Print informational text (section headers, current values)
    fn show(&mut self, message: &str);
}
