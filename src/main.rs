//! ffmeta
//!
//! A command-line tool for reading and editing media tags and chapters.
//!
//! # Usage
//!
//! ```bash
//! ffmeta probe movie.mkv > movie.json
//! ffmeta apply movie.mkv movie.json -o tagged.mkv
//! ffmeta show movie.mkv
//! ffmeta edit chapters movie.mkv --chapter 2
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use ffmeta::adapters::toml_config::load_config;
use ffmeta::adapters::tracing_log::init_tracing;
use ffmeta::app::container::DefaultAppContainer;
use ffmeta::cli::{commands, Cli};

/// Main entry point for the ffmeta CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // NO_COLOR disables colour for any non-empty value
    let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let (config, source) = load_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let format = cli.log_format.unwrap_or(config.logging.format);
    init_tracing(&level, format, console::colors_enabled_stderr())?;

    match &source {
        Some(path) => debug!("Using configuration from {}", path.display()),
        None => debug!("Using default configuration"),
    }

    let container = DefaultAppContainer::new(&config)?;
    commands::run(cli.command, &container).await
}
