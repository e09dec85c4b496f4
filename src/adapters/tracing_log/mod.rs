// Tracing log adapter - Structured logging using tracing crate

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::errors::*;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Check that a level name is one tracing understands
pub fn parse_level(level: &str) -> Result<tracing::Level, DomainError> {
    level.trim().parse::<tracing::Level>().map_err(|_| {
        DomainError::BadArgs(format!(
            "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
            level
        ))
    })
}

/// Install the global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set. Installing twice is
/// a no-op so tests and the binary can share this.
pub fn init_tracing(level: &str, format: LogFormat, ansi: bool) -> Result<(), DomainError> {
    let level = parse_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Pretty => builder.with_ansi(ansi).try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };
    Ok(())
}
