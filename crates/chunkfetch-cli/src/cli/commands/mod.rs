//! CLI command handlers, one per file.

mod ledger;
mod pending;
mod run;

pub use ledger::run_ledger;
pub use pending::run_pending;
pub use run::run_session;
