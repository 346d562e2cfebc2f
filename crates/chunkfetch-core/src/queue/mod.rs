//! Work queue: which requested files still need downloading, and at what priority.
//!
//! `input.txt` → [`read_requested`] → [`build`] (minus ledger) → `Vec<PendingItem>`.

mod build;
mod priority;
mod request;

pub use build::build;
pub use priority::Priority;
pub use request::{parse_requested, read_requested, RequestedFile};

/// One entry of the download queue, in requested-list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    pub filename: String,
    pub priority: Priority,
    /// Priority token exactly as written in the requested list; sent back to the server.
    pub token: String,
}

impl PendingItem {
    /// Request message for this item: `"<filename> <priorityToken>"`, no terminator.
    pub fn request(&self) -> String {
        format!("{} {}", self.filename, self.token)
    }
}

impl From<&RequestedFile> for PendingItem {
    fn from(r: &RequestedFile) -> Self {
        PendingItem {
            filename: r.filename.clone(),
            priority: Priority::from_token(&r.token),
            token: r.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_message_uses_raw_token() {
        let item = PendingItem {
            filename: "a.txt".into(),
            priority: Priority::Critical,
            token: "CRITICAL".into(),
        };
        assert_eq!(item.request(), "a.txt CRITICAL");

        let bare = PendingItem::from(&RequestedFile::parse("b.txt").unwrap());
        assert_eq!(bare.priority, Priority::Normal);
        assert_eq!(bare.request(), "b.txt ");
    }
}
