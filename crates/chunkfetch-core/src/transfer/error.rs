//! Transfer (sink) error type.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The output file could not be created. Ends the whole download session.
    #[error("cannot create {}: {source}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Disk write or flush failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    /// The server sent more bytes than it announced in BEGN.
    #[error("{filename}: {attempted} bytes exceeds declared size {expected}")]
    Overflow {
        filename: String,
        expected: u64,
        attempted: u64,
    },
    /// The server named a file that would land outside the output directory.
    #[error("refusing unsafe file name {0:?}")]
    UnsafeName(String),
    #[error("no transfer is open")]
    NotOpen,
}

impl TransferError {
    /// True when the scheduler must stop instead of moving to the next file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransferError::SinkOpen { .. })
    }
}
