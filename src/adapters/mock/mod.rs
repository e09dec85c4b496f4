//! In-memory adapters for tests and dry runs

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Probe adapter that answers every request with the same metadata
pub struct MockProbeAdapter {
    metadata: MediaMetadata,
}

impl MockProbeAdapter {
    pub fn new(metadata: MediaMetadata) -> Self {
        Self { metadata }
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn probe_media(&self, _media_path: &Path) -> Result<MediaMetadata, DomainError> {
        Ok(self.metadata.clone())
    }
}

/// One call received by [`MockApplyAdapter`]
#[derive(Debug, Clone)]
pub struct AppliedMetadata {
    pub media_path: PathBuf,
    pub metadata: MediaMetadata,
    pub output_path: PathBuf,
    pub overwrite: bool,
}

/// Apply adapter that records its calls instead of running a muxer
#[derive(Default)]
pub struct MockApplyAdapter {
    calls: Mutex<Vec<AppliedMetadata>>,
}

impl MockApplyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AppliedMetadata> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ApplyPort for MockApplyAdapter {
    async fn apply(
        &self,
        media_path: &Path,
        metadata: &MediaMetadata,
        output_path: &Path,
        overwrite: bool,
    ) -> Result<PathBuf, DomainError> {
        let mut calls = self
            .calls
            .lock()
            .map_err(|_| DomainError::FsFail("apply recorder poisoned".to_string()))?;
        calls.push(AppliedMetadata {
            media_path: media_path.to_path_buf(),
            metadata: metadata.clone(),
            output_path: output_path.to_path_buf(),
            overwrite,
        });
        Ok(output_path.to_path_buf())
    }
}

/// Prompter that replays a fixed list of answers.
///
/// An empty answer selects the prompt's default. Running out of answers
/// behaves like closed input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub warnings: Vec<String>,
    pub shown: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl PromptPort for ScriptedPrompter {
    fn read_value(&mut self, label: &str, default: Option<&str>) -> Result<String, DomainError> {
        self.prompts.push(label.to_string());
        let answer = self.answers.pop_front().ok_or(DomainError::EditAborted)?;
        if answer.trim().is_empty() {
            return Ok(default.unwrap_or_default().to_string());
        }
        Ok(answer)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, DomainError> {
        self.prompts.push(question.to_string());
        let answer = self.answers.pop_front().ok_or(DomainError::EditAborted)?;
        Ok(match answer.trim().to_ascii_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn show(&mut self, message: &str) {
        self.shown.push(message.to_string());
    }
}
