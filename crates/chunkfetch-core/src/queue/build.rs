//! Diff the requested list against the ledger.

use std::collections::HashSet;

use crate::config::LedgerMatch;

use super::{PendingItem, RequestedFile};

/// Requested entries not yet recorded in `completed`, in requested order.
///
/// With [`LedgerMatch::Substring`] an entry is dropped when any ledger name
/// occurs anywhere in its raw line; with [`LedgerMatch::Exact`] only when its
/// filename equals a ledger name. An empty ledger keeps everything.
pub fn build(
    requested: &[RequestedFile],
    completed: &HashSet<String>,
    mode: LedgerMatch,
) -> Vec<PendingItem> {
    requested
        .iter()
        .filter(|r| !is_completed(r, completed, mode))
        .map(PendingItem::from)
        .collect()
}

fn is_completed(r: &RequestedFile, completed: &HashSet<String>, mode: LedgerMatch) -> bool {
    match mode {
        LedgerMatch::Substring => completed.iter().any(|done| r.line.contains(done.as_str())),
        LedgerMatch::Exact => completed.contains(&r.filename),
    }
}
