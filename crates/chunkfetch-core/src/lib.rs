pub mod config;
pub mod logging;

pub mod connection;
pub mod control;
pub mod frame;
pub mod ledger;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod transfer;
