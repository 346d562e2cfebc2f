//! Errors that end the whole download session.

use crate::transfer::TransferError;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// An output file could not be created. Not retried.
    #[error("download session aborted: {0}")]
    SinkOpen(#[source] TransferError),
}
