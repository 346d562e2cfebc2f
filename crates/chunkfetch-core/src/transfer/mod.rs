//! Per-file transfer state: one open sink at a time.
//!
//! A [`TransferState`] exists for a filename only between its BEGN and its
//! END/ERRO. `bytes_written` never exceeds `expected_size`; a write that would
//! overflow is a protocol error and leaves the state untouched.

mod error;
mod name;

pub use error::TransferError;
pub use name::is_safe_filename;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// An in-progress single-file download.
#[derive(Debug)]
pub struct TransferState {
    filename: String,
    path: PathBuf,
    expected_size: u64,
    bytes_written: u64,
    sink: BufWriter<File>,
}

impl TransferState {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn expected_size(&self) -> u64 {
        self.expected_size
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Summary of a transfer after its sink has been closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTransfer {
    pub filename: String,
    pub path: PathBuf,
    pub expected_size: u64,
    pub bytes_written: u64,
}

impl ClosedTransfer {
    pub fn is_complete(&self) -> bool {
        self.bytes_written == self.expected_size
    }
}

/// Owns the single open transfer, writing under a fixed output directory.
#[derive(Debug)]
pub struct TransferTracker {
    output_dir: PathBuf,
    open: Option<TransferState>,
}

impl TransferTracker {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            open: None,
        }
    }

    pub fn current(&self) -> Option<&TransferState> {
        self.open.as_ref()
    }

    /// Open (truncate) `output_dir/filename`. Any transfer still open is aborted first.
    pub fn open(&mut self, filename: &str, expected_size: u64) -> Result<&TransferState, TransferError> {
        if !is_safe_filename(filename) {
            return Err(TransferError::UnsafeName(filename.to_string()));
        }
        if let Some(stale) = self.abort() {
            tracing::warn!(file = %stale.filename, "replacing transfer that never ended");
        }
        let path = self.output_dir.join(filename);
        let file = File::create(&path).map_err(|source| TransferError::SinkOpen {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(file = filename, size = expected_size, path = %path.display(), "sink opened");
        let state = self.open.insert(TransferState {
            filename: filename.to_string(),
            path,
            expected_size,
            bytes_written: 0,
            sink: BufWriter::new(file),
        });
        Ok(&*state)
    }

    /// Append `payload` to the open sink.
    pub fn write(&mut self, payload: &[u8]) -> Result<&TransferState, TransferError> {
        let state = self.open.as_mut().ok_or(TransferError::NotOpen)?;
        let attempted = state.bytes_written + payload.len() as u64;
        if attempted > state.expected_size {
            return Err(TransferError::Overflow {
                filename: state.filename.clone(),
                expected: state.expected_size,
                attempted,
            });
        }
        state.sink.write_all(payload).map_err(TransferError::Write)?;
        state.bytes_written = attempted;
        Ok(&*state)
    }

    /// Flush and close the open sink.
    pub fn close(&mut self) -> Result<ClosedTransfer, TransferError> {
        let state = self.open.take().ok_or(TransferError::NotOpen)?;
        let TransferState {
            filename,
            path,
            expected_size,
            bytes_written,
            sink,
        } = state;
        let file = sink.into_inner().map_err(|e| TransferError::Write(e.into_error()))?;
        file.sync_all().map_err(TransferError::Write)?;
        Ok(ClosedTransfer {
            filename,
            path,
            expected_size,
            bytes_written,
        })
    }

    /// Force-close whatever is open, ignoring flush errors. The partial file stays on disk.
    pub fn abort(&mut self) -> Option<ClosedTransfer> {
        let mut state = self.open.take()?;
        if let Err(e) = state.sink.flush() {
            tracing::debug!(file = %state.filename, error = %e, "flush on abort failed");
        }
        Some(ClosedTransfer {
            filename: state.filename,
            path: state.path,
            expected_size: state.expected_size,
            bytes_written: state.bytes_written,
        })
    }
}

impl Drop for TransferTracker {
    fn drop(&mut self) {
        if let Some(t) = self.abort() {
            tracing::info!(file = %t.filename, written = t.bytes_written, "closed unfinished transfer");
        }
    }
}
