// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File system failure (missing input, refused output, temp file)
    FsFail(String),
    /// The probe tool returned output the model cannot interpret
    MalformedProbeData(String),
    /// A chapter ordering or required-field rule was violated
    Validation(String),
    /// The user left an edit session before it completed
    EditAborted,
    /// The external probing/muxing process failed
    ExternalToolFailure {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },
    /// Metadata could not be encoded or decoded
    Serialization(String),
}

impl DomainError {
    /// Create an external tool failure from a finished process
    pub fn tool_failed(tool: &str, status: Option<i32>, stderr: impl Into<String>) -> Self {
        DomainError::ExternalToolFailure {
            tool: tool.to_string(),
            status,
            stderr: stderr.into(),
        }
    }

    /// Check whether the error came from the user leaving an edit session
    pub fn is_abort(&self) -> bool {
        matches!(self, DomainError::EditAborted)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::MalformedProbeData(msg) => write!(f, "Malformed probe data: {}", msg),
            DomainError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            DomainError::EditAborted => write!(f, "Edit aborted, no metadata was written"),
            DomainError::ExternalToolFailure {
                tool,
                status,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "{} exited with status {}", tool, code)?,
                    None => write!(f, "{} failed", tool)?,
                }
                let stderr = stderr.trim_end();
                if !stderr.is_empty() {
                    write!(f, ":\n{}", stderr)?;
                }
                Ok(())
            }
            DomainError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
