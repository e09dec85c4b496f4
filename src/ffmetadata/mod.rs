//! FFMETADATA1, the text format ffmpeg reads metadata from
//!
//! ```text
//! ;FFMETADATA1
//! title=Foo
//!
//! [STREAM]
//! language=eng
//!
//! [CHAPTER]
//! TIMEBASE=1/1000
//! START=0
//! END=60000
//! title=Intro
//! ```
//!
//! Keys and values escape `=`, `;`, `#`, `\` and line breaks with a
//! backslash. Lines starting with `;` or `#` are comments.

pub mod reader;
pub mod writer;

pub use reader::{parse_exchange, ExchangeChapter, ExchangeDocument};
pub use writer::{escape, serialize_for_apply};

/// First line of every document
pub const HEADER: &str = ";FFMETADATA1";

pub(crate) const STREAM_SECTION: &str = "[STREAM]";
pub(crate) const CHAPTER_SECTION: &str = "[CHAPTER]";

/// Check whether some text looks like an exchange document rather than JSON
pub fn is_exchange_document(content: &str) -> bool {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .next()
        .map(|line| line.trim().to_ascii_uppercase().starts_with(";FFMETADATA"))
        .unwrap_or(false)
}
