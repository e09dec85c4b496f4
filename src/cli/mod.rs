//! CLI module for ffmeta
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::tracing_log::LogFormat;

pub mod args;
pub mod commands;

/// Read, edit and write media metadata with ffprobe and ffmpeg
#[derive(Parser, Debug)]
#[command(name = "ffmeta")]
#[command(about = "Inspect and edit media tags and chapters")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output (also set by a non-empty NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the metadata of a media file
    Probe(args::ProbeArgs),
    /// Write metadata from a JSON or FFMETADATA file into a copy of a media file
    Apply(args::ApplyArgs),
    /// Show tags, streams and chapters of a media file
    Show(args::ShowArgs),
    /// Interactively edit metadata and write it into a copy of a media file
    #[command(subcommand)]
    Edit(args::EditCommand),
}
