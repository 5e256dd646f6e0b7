//! Capture file reading
//!
//! Reads a whole capture file into an ordered list of raw record lines. The
//! file handle is scoped to the read; per-record trimming and tokenization
//! happen later in [`crate::features`].

use std::fs;
use std::path::Path;

use crate::error::ExtractError;

/// Default capture file path written by the collection tool
pub const DEFAULT_INPUT_PATH: &str = "./OriginData.txt";

/// Read `path` into raw record lines, preserving input order
///
/// Line terminators are stripped by the split; a trailing newline at end of
/// file does not produce a phantom record. Blank lines are kept so that
/// malformed input fails loudly during extraction instead of being skipped.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ExtractError> {
    let contents = fs::read_to_string(path)?;
    Ok(split_lines(&contents))
}

/// Split raw file contents into record lines
pub fn split_lines(contents: &str) -> Vec<String> {
    contents.lines().map(str::to_owned).collect()
}
