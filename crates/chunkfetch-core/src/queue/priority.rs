//! Three-level priority class and its advisory chunk hint.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Critical,
    High,
    Normal,
}

impl Priority {
    /// `"CRITICAL"` and `"HIGH"` (case-sensitive) map to their class; anything else is Normal.
    pub fn from_token(token: &str) -> Self {
        match token {
            "CRITICAL" => Priority::Critical,
            "HIGH" => Priority::High,
            _ => Priority::Normal,
        }
    }

    /// Chunks-per-turn hint for the server. Advisory only; the client never batches on it.
    pub fn hint(self) -> u32 {
        match self {
            Priority::Critical => 10,
            Priority::High => 4,
            Priority::Normal => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_per_class() {
        assert_eq!(Priority::from_token("CRITICAL").hint(), 10);
        assert_eq!(Priority::from_token("HIGH").hint(), 4);
        assert_eq!(Priority::from_token("anything-else").hint(), 1);
        assert_eq!(Priority::from_token("").hint(), 1);
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert_eq!(Priority::from_token("critical"), Priority::Normal);
        assert_eq!(Priority::from_token("High"), Priority::Normal);
        assert_eq!(Priority::from_token("NORMAL"), Priority::Normal);
    }
}
