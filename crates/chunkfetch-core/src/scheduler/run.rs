//! The scheduler and its top-level loop.

use tokio::sync::mpsc::UnboundedSender;

use crate::connection::Connection;
use crate::control::CancelToken;
use crate::ledger::Ledger;
use crate::queue::PendingItem;
use crate::transfer::TransferTracker;

use super::error::SchedulerError;
use super::progress::ProgressEvent;
use super::step::FileOutcome;

/// Why [`Scheduler::run`] returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The cancel token was set.
    Cancelled,
    /// The server closed the stream (or it failed) with no END/ERRO.
    ConnectionClosed,
}

/// Totals for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub end: SessionEnd,
    pub completed: usize,
    pub failed: usize,
}

/// Owns the connection and queue for the lifetime of a download session.
pub struct Scheduler<C> {
    pub(super) conn: C,
    pub(super) queue: Vec<PendingItem>,
    pub(super) current_index: usize,
    pub(super) tracker: TransferTracker,
    pub(super) ledger: Ledger,
    pub(super) cancel: CancelToken,
    pub(super) events: Option<UnboundedSender<ProgressEvent>>,
}

impl<C: Connection> Scheduler<C> {
    pub fn new(
        conn: C,
        queue: Vec<PendingItem>,
        tracker: TransferTracker,
        ledger: Ledger,
        cancel: CancelToken,
    ) -> Self {
        Self {
            conn,
            queue,
            current_index: 0,
            tracker,
            ledger,
            cancel,
            events: None,
        }
    }

    /// Send lifecycle and progress events to `tx`.
    pub fn with_events(mut self, tx: UnboundedSender<ProgressEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn queue(&self) -> &[PendingItem] {
        &self.queue
    }

    /// Queue position the next [`step`](Self::step) will request.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn into_connection(mut self) -> C {
        self.tracker.abort();
        self.conn
    }

    /// Run until cancelled, the connection closes, or a sink cannot be opened.
    ///
    /// Cancellation is checked between files and while the queue is empty;
    /// a blocking receive is never interrupted. An empty queue is polled
    /// without blocking.
    pub fn run(&mut self) -> Result<SessionReport, SchedulerError> {
        let mut completed = 0;
        let mut failed = 0;
        let end = loop {
            if self.cancel.is_cancelled() {
                break SessionEnd::Cancelled;
            }
            if self.queue.is_empty() {
                std::thread::yield_now();
                continue;
            }
            match self.step() {
                Ok(Some(FileOutcome::Completed { .. })) => completed += 1,
                Ok(Some(FileOutcome::Failed { .. })) => failed += 1,
                Ok(Some(FileOutcome::ConnectionClosed { .. })) => break SessionEnd::ConnectionClosed,
                Ok(None) => {}
                Err(e) => {
                    self.tracker.abort();
                    tracing::error!(error = %e, "download session aborted");
                    return Err(e);
                }
            }
        };
        if let Some(t) = self.tracker.abort() {
            tracing::info!(file = %t.filename, written = t.bytes_written, "closed unfinished transfer");
        }
        tracing::info!(?end, completed, failed, "download session ended");
        Ok(SessionReport {
            end,
            completed,
            failed,
        })
    }

    pub(super) fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    pub(super) fn advance(&mut self) {
        self.current_index = (self.current_index + 1) % self.queue.len();
    }
}
