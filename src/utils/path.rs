//! Output path rules for commands that write a new media file

use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;

/// `<stem>.ffmeta.<ext>` beside the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}.ffmeta.{}", stem, ext.to_string_lossy()),
        None => format!("{}.ffmeta", stem),
    };
    input.with_file_name(name)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Pick the output path and refuse destinations that must not be written.
///
/// The input itself is never a valid destination; an existing file is only
/// accepted with `overwrite`.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    overwrite: bool,
) -> Result<PathBuf, DomainError> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };

    if same_file(input, &output) {
        return Err(DomainError::FsFail(format!(
            "Refusing to write over the input file {}",
            input.display()
        )));
    }
    if output.exists() && !overwrite {
        return Err(DomainError::FsFail(format!(
            "Output file {} already exists, pass --overwrite to replace it",
            output.display()
        )));
    }
    Ok(output)
}
