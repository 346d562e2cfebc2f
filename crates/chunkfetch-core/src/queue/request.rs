//! Parsing the requested-files list (`input.txt`).

use anyhow::{Context, Result};
use std::path::Path;

/// One line of the requested-files list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedFile {
    /// The raw source line; ledger substring matching runs against this.
    pub line: String,
    pub filename: String,
    /// Second whitespace-delimited token, or empty when absent.
    pub token: String,
}

impl RequestedFile {
    /// Parse `"<filename> <priority>"`. Returns None for blank lines; extra tokens are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        let mut tokens = line.split_whitespace();
        let filename = tokens.next()?;
        let token = tokens.next().unwrap_or("");
        Some(RequestedFile {
            line: line.to_string(),
            filename: filename.to_string(),
            token: token.to_string(),
        })
    }
}

/// Parse every non-blank line of a requested-files list, preserving order.
pub fn parse_requested(text: &str) -> Vec<RequestedFile> {
    text.lines().filter_map(RequestedFile::parse).collect()
}

/// Read and parse a requested-files list from disk.
pub fn read_requested(path: &Path) -> Result<Vec<RequestedFile>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read requested files list: {}", path.display()))?;
    Ok(parse_requested(&text))
}
