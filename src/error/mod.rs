//! Error handling module for FFMeta

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for FFMeta operations outside the domain layer
#[derive(Error, Debug)]
pub enum FfmetaError {
    /// Error raised by domain logic or a port
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration file could not be parsed or failed validation
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: String, message: String },

    /// TOML error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for FFMeta operations
pub type FfmetaResult<T> = std::result::Result<T, FfmetaError>;
