//! Progress reporting for downloads (bytes done, ETA, rate).
//!
//! The scheduler emits [`ProgressEvent`]s on an unbounded channel; `Progress`
//! is only sent when the whole-percent value changes, so volume stays bounded.

/// Snapshot of download progress for the open file.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    pub filename: String,
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Size declared by BEGN.
    pub total_bytes: u64,
    /// Elapsed time since BEGN (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Whole percent, as printed on the progress line.
    pub fn percent(&self) -> u64 {
        if self.total_bytes == 0 {
            return 100;
        }
        self.bytes_done.saturating_mul(100) / self.total_bytes
    }
}

/// User-visible lifecycle of each file.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started { filename: String, size: u64 },
    Progress(ProgressStats),
    Finished { filename: String, bytes: u64 },
    Failed { filename: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(done: u64, total: u64, secs: f64) -> ProgressStats {
        ProgressStats {
            filename: "f".into(),
            bytes_done: done,
            total_bytes: total,
            elapsed_secs: secs,
        }
    }

    #[test]
    fn percent_rounds_down() {
        assert_eq!(stats(50, 200, 1.0).percent(), 25);
        assert_eq!(stats(199, 200, 1.0).percent(), 99);
        assert_eq!(stats(0, 0, 0.0).percent(), 100);
    }

    #[test]
    fn rate_and_eta() {
        let s = stats(100, 300, 2.0);
        assert!((s.bytes_per_sec() - 50.0).abs() < 1e-9);
        assert!((s.eta_secs().unwrap() - 4.0).abs() < 1e-9);
        assert_eq!(stats(10, 10, 0.0).eta_secs(), Some(0.0));
        assert!(stats(0, 10, 0.0).eta_secs().is_none());
    }
}
