// Edit interactor - Interactive editing of tags and chapters

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::app::apply_interactor::{ApplyInteractor, ApplyOutcome, ApplyRequest};
use crate::domain::errors::*;
use crate::domain::fields::{EditSpecification, TagDefinition};
use crate::domain::model::*;
use crate::domain::rules::{check_chapter_fits, is_reserved_chapter_key};
use crate::ports::*;


/// What an edit session changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Tags,
    Chapters,
    /// A single chapter, zero-based
    Chapter(usize),
    All,
}

/// Request for an interactive edit followed by an apply
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub media_path: PathBuf,
    pub mode: EditMode,
    pub output_path: Option<PathBuf>,
    pub overwrite: bool,
}

/// Interactor for the edit use case: probe, prompt, confirm, apply
pub struct EditInteractor {
    probe_port: Arc<dyn ProbePort>,
    apply: ApplyInteractor,
    workflow: EditWorkflow,
}

impl EditInteractor {
    /// Create new edit interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        apply_port: Arc<dyn ApplyPort>,
        tag_spec: EditSpecification,
    ) -> Self {
        Self {
            probe_port,
            apply: ApplyInteractor::new(apply_port),
            workflow: EditWorkflow::new(tag_spec),
        }
    }

    /// Execute an edit session, returning the written file.
    ///
    /// The output path is checked before any prompt so that a refused
    /// destination does not waste the user's answers.
    pub async fn execute(
        &self,
        request: EditRequest,
        prompter: &mut dyn PromptPort,
    ) -> Result<PathBuf, DomainError> {
        let output_path = self.apply.prepare(
            &request.media_path,
            request.output_path.as_deref(),
            request.overwrite,
        )?;
        let current = self.probe_port.probe_media(&request.media_path).await?;

        let edited = match request.mode {
            EditMode::Tags => self.workflow.edit_tags(&current, prompter)?,
            EditMode::Chapters => self.workflow.edit_chapters(&current, prompter)?,
            EditMode::Chapter(index) => self.workflow.edit_chapter_at(&current, index, prompter)?,
            EditMode::All => self.workflow.edit_all(&current, prompter)?,
        };
        edited.ensure_complete()?;

        if edited == current {
            prompter.show("No changes were made");
        }
        let question = format!("Write metadata to {}?", output_path.display());
        if !prompter.confirm(&question, true)? {
            info!("Edit declined at confirmation");
            return Err(DomainError::EditAborted);
        }

        self.apply
            .execute(ApplyRequest {
                media_path: request.media_path,
                metadata: edited,
                output_path: Some(output_path),
                overwrite: request.overwrite,
                dry_run: false,
            })
            .await
            .map(|outcome| match outcome {
                ApplyOutcome::Written(path) => path,
                ApplyOutcome::DryRun { output_path, .. } => output_path,
            })
    }
}

/// Answer that removes an optional tag instead of keeping its default
const CLEAR_ANSWER: &str = "-";

/// Values entered so far for one chapter, used to pre-fill the next attempt
#[derive(Debug, Clone, Default)]
struct ChapterDraft {
    title: String,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    extra: Tags,
}

impl ChapterDraft {
    fn from_chapter(chapter: &Chapter) -> Self {
        Self {
            title: chapter.title().to_string(),
            start: Some(chapter.start()),
            end: Some(chapter.end()),
            extra: chapter.extra_tags().collect(),
        }
    }
}

/// Prompt-driven editing of a [`MediaMetadata`].
///
/// Every operation borrows the current metadata and returns an edited copy,
/// so an abort at any prompt leaves the caller's metadata untouched.
pub struct EditWorkflow {
    tag_spec: EditSpecification,
    chapter_spec: EditSpecification,
}

impl EditWorkflow {
    pub fn new(tag_spec: EditSpecification) -> Self {
        Self {
            tag_spec,
            chapter_spec: EditSpecification::for_chapters(),
        }
    }

    /// Prompt for the global tags; the answers replace the current mapping
    pub fn edit_tags(
        &self,
        current: &MediaMetadata,
        prompter: &mut dyn PromptPort,
    ) -> Result<MediaMetadata, DomainError> {
        info!("Editing tags");
        prompter.show("Tags");
        if !current.tags().is_empty() {
            let listing: Vec<String> = current
                .tags()
                .iter()
                .map(|(key, value)| format!("  {} = {}", key, value))
                .collect();
            prompter.show(&format!("Current tags:\n{}", listing.join("\n")));
        }

        let mut tags = Tags::new();
        for definition in &self.tag_spec.required {
            let value = prompt_tag(prompter, definition, current.tags().get(&definition.key), true)?;
            tags.insert(definition.key.clone(), value);
        }

        if !self.tag_spec.optional.is_empty() {
            let keys: Vec<&str> = self.tag_spec.optional.iter().map(|d| d.key.as_str()).collect();
            prompter.show(&format!("Suggested tags: {}", keys.join(", ")));
        }

        loop {
            let key = prompter.read_value("Additional tag key (blank finishes)", None)?;
            let key = key.trim();
            if key.is_empty() {
                break;
            }
            let definition = self.tag_spec.definition_for(key);
            let default = tags
                .get(key)
                .or_else(|| current.tags().get(key))
                .map(str::to_string);
            let required = self.tag_spec.is_required(key);
            let value = prompt_tag(prompter, &definition, default.as_deref(), required)?;
            if value.is_empty() {
                tags.remove(key);
            } else {
                tags.insert(key, value);
            }
        }

        debug!("Edited {} tags", tags.len());
        let mut updated = current.clone();
        updated.set_tags(tags);
        Ok(updated)
    }

    /// Walk the existing chapters, then offer to append new ones
    pub fn edit_chapters(
        &self,
        current: &MediaMetadata,
        prompter: &mut dyn PromptPort,
    ) -> Result<MediaMetadata, DomainError> {
        info!("Editing {} chapters", current.chapters().len());
        let total = current.chapters().len();
        let mut accepted: Vec<Chapter> = Vec::with_capacity(total);

        for (i, existing) in current.chapters().iter().enumerate() {
            prompter.show(&format!(
                "Chapter {} of {} ({} - {})",
                i + 1,
                total,
                existing.start(),
                existing.end()
            ));
            let chapter = self.prompt_chapter(prompter, &accepted, None, ChapterDraft::from_chapter(existing))?;
            accepted.push(chapter);
        }

        while prompter.confirm("Add a new chapter?", false)? {
            prompter.show(&format!("Chapter {}", accepted.len() + 1));
            let draft = ChapterDraft {
                start: Some(accepted.last().map(|c| c.end()).unwrap_or(Timestamp::ZERO)),
                ..Default::default()
            };
            let chapter = self.prompt_chapter(prompter, &accepted, None, draft)?;
            accepted.push(chapter);
        }

        let mut updated = current.clone();
        updated.set_chapters(accepted)?;
        Ok(updated)
    }

    /// Re-prompt one chapter (zero-based), keeping it between its neighbours
    pub fn edit_chapter_at(
        &self,
        current: &MediaMetadata,
        index: usize,
        prompter: &mut dyn PromptPort,
    ) -> Result<MediaMetadata, DomainError> {
        let chapters = current.chapters();
        let existing = chapters.get(index).ok_or_else(|| {
            DomainError::BadArgs(format!(
                "Chapter {} does not exist, the file has {} chapters",
                index + 1,
                chapters.len()
            ))
        })?;

        prompter.show(&format!(
            "Chapter {} of {} ({} - {})",
            index + 1,
            chapters.len(),
            existing.start(),
            existing.end()
        ));
        let chapter = self.prompt_chapter(
            prompter,
            &chapters[..index],
            chapters.get(index + 1),
            ChapterDraft::from_chapter(existing),
        )?;

        let mut edited = chapters.to_vec();
        edited[index] = chapter;
        let mut updated = current.clone();
        updated.set_chapters(edited)?;
        Ok(updated)
    }

    /// Tags, then chapters, on one working copy
    pub fn edit_all(
        &self,
        current: &MediaMetadata,
        prompter: &mut dyn PromptPort,
    ) -> Result<MediaMetadata, DomainError> {
        let with_tags = self.edit_tags(current, prompter)?;
        self.edit_chapters(&with_tags, prompter)
    }

    fn prompt_chapter(
        &self,
        prompter: &mut dyn PromptPort,
        accepted: &[Chapter],
        next: Option<&Chapter>,
        mut draft: ChapterDraft,
    ) -> Result<Chapter, DomainError> {
        let title_definition = self.chapter_spec.definition_for(TITLE_KEY);

        loop {
            let default_title = Some(draft.title.as_str()).filter(|t| !t.is_empty());
            draft.title = prompt_tag(prompter, &title_definition, default_title, true)?;
            let start = prompt_time(prompter, "Start", draft.start)?;
            draft.start = Some(start);
            let end = prompt_time(prompter, "End", draft.end)?;
            draft.end = Some(end);
            self.prompt_chapter_tags(prompter, &mut draft.extra)?;

            let mut tags = Tags::new();
            tags.insert(TITLE_KEY, draft.title.clone());
            for (key, value) in draft.extra.iter() {
                tags.insert(key, value);
            }

            let candidate = Chapter::with_tags(start, end, tags)
                .and_then(|chapter| check_chapter_fits(accepted, next, &chapter).map(|_| chapter));
            match candidate {
                Ok(chapter) => return Ok(chapter),
                Err(e) => prompter.warn(&format!("{}, please re-enter the chapter", e)),
            }
        }
    }

    fn prompt_chapter_tags(
        &self,
        prompter: &mut dyn PromptPort,
        extra: &mut Tags,
    ) -> Result<(), DomainError> {
        loop {
            let key = prompter.read_value("Additional chapter tag key (blank finishes)", None)?;
            let key = key.trim();
            if key.is_empty() {
                return Ok(());
            }
            if key.eq_ignore_ascii_case(TITLE_KEY) {
                prompter.warn("The title was already entered above");
                continue;
            }
            if is_reserved_chapter_key(key) {
                prompter.warn(&format!("'{}' is reserved for chapter timing", key));
                continue;
            }
            let definition = self.chapter_spec.definition_for(key);
            let default = extra.get(key).map(str::to_string);
            let value = prompt_tag(prompter, &definition, default.as_deref(), false)?;
            if value.is_empty() {
                extra.remove(key);
            } else {
                extra.insert(key, value);
            }
        }
    }
}

fn tag_label(definition: &TagDefinition) -> String {
    if definition.label.eq_ignore_ascii_case(&definition.key) {
        definition.key.clone()
    } else {
        format!("{} ({})", definition.label, definition.key)
    }
}

/// Ask for a tag value until it passes the definition's validators.
///
/// Blank answers are rejected for required tags and returned as an empty
/// string otherwise. A blank answer with a default yields the default, so
/// optional tags offer `-` to clear an existing value.
fn prompt_tag(
    prompter: &mut dyn PromptPort,
    definition: &TagDefinition,
    default: Option<&str>,
    required: bool,
) -> Result<String, DomainError> {
    let label = match default {
        Some(_) if !required => format!("{} ('{}' removes)", tag_label(definition), CLEAR_ANSWER),
        _ => tag_label(definition),
    };
    loop {
        let value = prompter.read_value(&label, default)?;
        let value = value.trim();
        if !required && value == CLEAR_ANSWER {
            return Ok(String::new());
        }
        if value.is_empty() {
            if required {
                prompter.warn(&format!("{} is required", definition.label));
                continue;
            }
            return Ok(String::new());
        }
        match definition.validate(value) {
            Ok(()) => return Ok(value.to_string()),
            Err(e) => prompter.warn(&e.to_string()),
        }
    }
}

fn prompt_time(
    prompter: &mut dyn PromptPort,
    label: &str,
    default: Option<Timestamp>,
) -> Result<Timestamp, DomainError> {
    let default = default.map(|t| t.format_hms());
    let label = format!("{} (HH:MM:SS.mmm or seconds)", label);
    loop {
        let value = prompter.read_value(&label, default.as_deref())?;
        let value = value.trim();
        if value.is_empty() {
            prompter.warn("A time is required");
            continue;
        }
        match Timestamp::parse(value) {
            Ok(timestamp) => return Ok(timestamp),
            Err(e) => prompter.warn(&e.to_string()),
        }
    }
}
