//! Append-only ledger of completed downloads (`downloaded_files.txt`).
//!
//! One filename per line. Restarts load the ledger and skip files already
//! fetched. Duplicate lines from separate runs are tolerated.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The ledger could not be opened or written for append.
#[derive(Debug, thiserror::Error)]
#[error("ledger {}: {source}", path.display())]
pub struct PersistenceError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Completed filenames. A missing ledger is an empty set; blank lines are skipped.
    pub fn load(&self) -> Result<HashSet<String>, PersistenceError> {
        self.entries().map(|v| v.into_iter().collect())
    }

    /// Completed filenames in file order, duplicates included.
    pub fn entries(&self) -> Result<Vec<String>, PersistenceError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(data
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Append one completed filename, creating the ledger if absent.
    pub fn append(&self, filename: &str) -> Result<(), PersistenceError> {
        let wrap = |source| PersistenceError {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(wrap)?;
        writeln!(file, "{filename}").map_err(wrap)?;
        Ok(())
    }
}
