//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::TerminalPrompter;
use crate::app::apply_interactor::{load_metadata_file, ApplyOutcome, ApplyRequest};
use crate::app::container::AppContainer;
use crate::app::edit_interactor::{EditMode, EditRequest};
use crate::app::probe_interactor::ProbeRequest;
use crate::cli::args::{ApplyArgs, EditCommand, ProbeArgs, ShowArgs};
use crate::cli::Commands;

/// Dispatch a parsed command
pub async fn run(command: Commands, container: &dyn AppContainer) -> Result<()> {
    match command {
        Commands::Probe(args) => probe(args, container).await,
        Commands::Apply(args) => apply(args, container).await,
        Commands::Show(args) => show(args, container).await,
        Commands::Edit(command) => edit(command, container).await,
    }
}

/// Execute the probe command
pub async fn probe(args: ProbeArgs, container: &dyn AppContainer) -> Result<()> {
    let response = container
        .probe_interactor()
        .execute(ProbeRequest {
            media_path: args.path.clone(),
            format: args.format.into(),
        })
        .await
        .with_context(|| format!("Failed to probe {}", args.path.display()))?;
    print_document(&response.rendered);
    Ok(())
}

/// Execute the show command
pub async fn show(args: ShowArgs, container: &dyn AppContainer) -> Result<()> {
    let response = container
        .probe_interactor()
        .execute(ProbeRequest {
            media_path: args.path.clone(),
            format: args.format.into(),
        })
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    print_document(&response.rendered);
    Ok(())
}

/// Execute the apply command
pub async fn apply(args: ApplyArgs, container: &dyn AppContainer) -> Result<()> {
    let metadata = load_metadata_file(&args.metadata_path)
        .with_context(|| format!("Failed to load metadata from {}", args.metadata_path.display()))?;

    let outcome = container
        .apply_interactor()
        .execute(ApplyRequest {
            media_path: args.media_path.clone(),
            metadata,
            output_path: args.output,
            overwrite: args.overwrite,
            dry_run: args.dry_run,
        })
        .await
        .with_context(|| format!("Failed to apply metadata to {}", args.media_path.display()))?;

    match outcome {
        ApplyOutcome::Written(path) => println!("Wrote {}", path.display()),
        ApplyOutcome::DryRun {
            output_path,
            document,
        } => {
            info!("Dry run, {} was not written", output_path.display());
            print_document(&document);
        }
    }
    Ok(())
}

/// Execute one of the edit commands
pub async fn edit(command: EditCommand, container: &dyn AppContainer) -> Result<()> {
    let (target, mode) = match command {
        EditCommand::Tags(target) => (target, EditMode::Tags),
        EditCommand::All(target) => (target, EditMode::All),
        EditCommand::Chapters(chapters) => {
            let mode = match chapters.chapter {
                Some(number) => EditMode::Chapter(usize::try_from(number - 1)?),
                None => EditMode::Chapters,
            };
            (chapters.target, mode)
        }
    };

    let mut prompter = TerminalPrompter::stdin();
    let written = container
        .edit_interactor()
        .execute(
            EditRequest {
                media_path: target.path.clone(),
                mode,
                output_path: target.output,
                overwrite: target.overwrite,
            },
            &mut prompter,
        )
        .await
        .with_context(|| format!("Failed to edit {}", target.path.display()))?;

    println!("Wrote {}", written.display());
    Ok(())
}

fn print_document(document: &str) {
    if document.ends_with('\n') {
        print!("{}", document);
    } else {
        println!("{}", document);
    }
}
