//! Download scheduler.
//!
//! Walks the work queue in a fixed rotation, one request in flight at a time:
//! send `"<filename> <priority>"`, then consume response records until END,
//! ERRO, or the connection closes. Completed items stay in the rotation.

mod error;
mod progress;
mod run;
mod step;

pub use error::SchedulerError;
pub use progress::{ProgressEvent, ProgressStats};
pub use run::{Scheduler, SessionEnd, SessionReport};
pub use step::{FailReason, FileOutcome};
