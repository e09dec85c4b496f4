//! ffmeta library
//!
//! Reads tags, per-stream tags and chapters from media files with
//! `ffprobe`, edits them interactively and writes them back into a copy of
//! the file with a single `ffmpeg` stream-copy pass.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod ffmetadata;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{Chapter, CodecType, MediaMetadata, StreamMetadata, Tags, Timestamp};
pub use error::{FfmetaError, FfmetaResult};
pub use ffmetadata::{parse_exchange, serialize_for_apply};
