//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::app::probe_interactor::OutputFormat;

/// Formats accepted by `probe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProbeFormat {
    Json,
    Yaml,
    Ffmetadata,
}

impl From<ProbeFormat> for OutputFormat {
    fn from(format: ProbeFormat) -> Self {
        match format {
            ProbeFormat::Json => OutputFormat::Json,
            ProbeFormat::Yaml => OutputFormat::Yaml,
            ProbeFormat::Ffmetadata => OutputFormat::Ffmetadata,
        }
    }
}

/// Formats accepted by `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Text,
    Json,
    Yaml,
}

impl From<ShowFormat> for OutputFormat {
    fn from(format: ShowFormat) -> Self {
        match format {
            ShowFormat::Text => OutputFormat::Text,
            ShowFormat::Json => OutputFormat::Json,
            ShowFormat::Yaml => OutputFormat::Yaml,
        }
    }
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media file to read
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = ProbeFormat::Json)]
    pub format: ProbeFormat,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Media file to copy
    pub media_path: PathBuf,

    /// Metadata file (JSON, or FFMETADATA starting with ;FFMETADATA1)
    pub metadata_path: PathBuf,

    /// Output file path (default: <stem>.ffmeta.<ext> beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace the output file if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Print the FFMETADATA document instead of running ffmpeg
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Media file to read
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = ShowFormat::Text)]
    pub format: ShowFormat,
}

/// Input and output shared by the edit commands
#[derive(Args, Debug)]
pub struct EditTargetArgs {
    /// Media file to edit
    pub path: PathBuf,

    /// Output file path (default: <stem>.ffmeta.<ext> beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace the output file if it exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for `edit chapters`
#[derive(Args, Debug)]
pub struct EditChaptersArgs {
    #[command(flatten)]
    pub target: EditTargetArgs,

    /// Only edit chapter N (starting at 1)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub chapter: Option<u64>,
}

/// What to edit
#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// Edit the global tags
    Tags(EditTargetArgs),
    /// Edit the chapters
    Chapters(EditChaptersArgs),
    /// Edit tags, then chapters
    All(EditTargetArgs),
}
