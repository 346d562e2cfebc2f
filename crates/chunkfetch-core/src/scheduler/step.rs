//! One turn of the rotation: the per-file state machine.
//!
//! ```text
//! IDLE --send request--> AWAITING_BEGIN --BEGN--> RECEIVING --DATA--> RECEIVING
//!                              |                     |--END--> DONE
//!                              +-------ERRO/fault----+-------> FAILED
//! ```

use std::time::Instant;

use crate::connection::Connection;
use crate::frame::{self, Frame, RECORD_SIZE};
use crate::transfer::TransferError;

use super::error::SchedulerError;
use super::progress::{ProgressEvent, ProgressStats};
use super::run::Scheduler;

/// Result of one queue position.
#[derive(Debug)]
pub enum FileOutcome {
    /// END processed. `recorded` is false when the ledger append failed.
    Completed {
        filename: String,
        bytes: u64,
        recorded: bool,
    },
    Failed {
        filename: String,
        reason: FailReason,
    },
    /// The stream ended (or errored) with no END/ERRO; nothing recorded.
    ConnectionClosed { filename: String },
}

#[derive(Debug)]
pub enum FailReason {
    /// Server sent ERRO.
    Server,
    /// Writing, closing, or naming the output file failed.
    Transfer(TransferError),
    /// END arrived for a file that was never begun.
    Unmatched { end_for: String },
}

impl std::fmt::Display for FailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailReason::Server => write!(f, "file not found or other server error"),
            FailReason::Transfer(e) => write!(f, "{e}"),
            FailReason::Unmatched { end_for } => write!(f, "END for {end_for} without BEGN"),
        }
    }
}

impl<C: Connection> Scheduler<C> {
    /// Request the item at the current index and consume its response.
    ///
    /// Advances the rotation on DONE or FAILED; leaves it in place when the
    /// connection closes. Returns `Ok(None)` if the queue is empty.
    pub fn step(&mut self) -> Result<Option<FileOutcome>, SchedulerError> {
        let Some(item) = self.queue.get(self.current_index).cloned() else {
            return Ok(None);
        };
        let request = item.request();
        let wanted = item.filename;

        tracing::debug!(
            file = %wanted,
            priority = %item.priority,
            hint = item.priority.hint(),
            index = self.current_index,
            "requesting"
        );
        if let Err(e) = self.conn.send(request.as_bytes()) {
            tracing::warn!(file = %wanted, error = %e, "send failed");
            return Ok(Some(FileOutcome::ConnectionClosed { filename: wanted }));
        }

        let mut started: Option<Instant> = None;
        let mut last_percent: Option<u64> = None;

        let outcome = loop {
            let record = match self.conn.receive(RECORD_SIZE) {
                Ok(r) if r.is_empty() => {
                    tracing::warn!(file = %wanted, "connection closed mid-transfer");
                    self.tracker.abort();
                    return Ok(Some(FileOutcome::ConnectionClosed { filename: wanted }));
                }
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(file = %wanted, error = %e, "receive failed");
                    self.tracker.abort();
                    return Ok(Some(FileOutcome::ConnectionClosed { filename: wanted }));
                }
            };

            let decoded = match frame::decode(&record) {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!(file = %wanted, error = %e, "dropping malformed record");
                    continue;
                }
            };

            match decoded {
                Frame::Begin { filename, size } => {
                    if filename != wanted {
                        tracing::warn!(requested = %wanted, got = %filename, "dropping BEGN for another file");
                        continue;
                    }
                    match self.tracker.open(&filename, size).map(|_| ()) {
                        Ok(()) => {}
                        Err(e) if e.is_fatal() => return Err(SchedulerError::SinkOpen(e)),
                        Err(e) => break self.fail(wanted, FailReason::Transfer(e)),
                    }
                    tracing::info!(file = %filename, size, "download started");
                    started = Some(Instant::now());
                    last_percent = None;
                    self.emit(ProgressEvent::Started { filename, size });
                }
                Frame::Data { payload } => {
                    if self.tracker.current().is_none() {
                        tracing::debug!(file = %wanted, len = payload.len(), "DATA with no open transfer");
                        continue;
                    }
                    let written = self.tracker.write(payload).map(|state| ProgressStats {
                        filename: state.filename().to_string(),
                        bytes_done: state.bytes_written(),
                        total_bytes: state.expected_size(),
                        elapsed_secs: started.map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0),
                    });
                    let stats = match written {
                        Ok(stats) => stats,
                        Err(e) => break self.fail(wanted, FailReason::Transfer(e)),
                    };
                    let pct = stats.percent();
                    if last_percent != Some(pct) {
                        last_percent = Some(pct);
                        self.emit(ProgressEvent::Progress(stats));
                    }
                }
                Frame::End { filename } => {
                    let open_matches = self
                        .tracker
                        .current()
                        .is_some_and(|s| s.filename() == filename);
                    if !open_matches {
                        break self.fail(wanted, FailReason::Unmatched { end_for: filename });
                    }
                    break match self.tracker.close() {
                        Ok(closed) => self.complete(closed),
                        Err(e) => self.fail(wanted, FailReason::Transfer(e)),
                    };
                }
                Frame::Error => break self.fail(wanted, FailReason::Server),
                Frame::Unknown => {}
            }
        };

        if matches!(outcome, FileOutcome::Failed { .. }) {
            if let Some(t) = self.tracker.abort() {
                tracing::debug!(file = %t.filename, written = t.bytes_written, "closed sink of failed file");
            }
        }
        self.advance();
        Ok(Some(outcome))
    }

    fn complete(&self, closed: crate::transfer::ClosedTransfer) -> FileOutcome {
        if !closed.is_complete() {
            tracing::warn!(
                file = %closed.filename,
                expected = closed.expected_size,
                written = closed.bytes_written,
                "END before declared size was reached"
            );
        }
        let recorded = match self.ledger.append(&closed.filename) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "could not record completed download");
                false
            }
        };
        tracing::info!(file = %closed.filename, bytes = closed.bytes_written, "download finished");
        self.emit(ProgressEvent::Finished {
            filename: closed.filename.clone(),
            bytes: closed.bytes_written,
        });
        FileOutcome::Completed {
            filename: closed.filename,
            bytes: closed.bytes_written,
            recorded,
        }
    }

    fn fail(&self, filename: String, reason: FailReason) -> FileOutcome {
        tracing::warn!(file = %filename, reason = %reason, "download failed");
        self.emit(ProgressEvent::Failed {
            filename: filename.clone(),
            reason: reason.to_string(),
        });
        FileOutcome::Failed { filename, reason }
    }
}
