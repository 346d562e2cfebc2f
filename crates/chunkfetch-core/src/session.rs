//! Session setup: connect, read the server's file listing, plan the queue.

use anyhow::{Context, Result};
use std::io;

use crate::config::ChunkfetchConfig;
use crate::connection::{Connection, TcpConnection};
use crate::ledger::Ledger;
use crate::queue::{self, PendingItem};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unable to connect to server {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read file listing from server: {0}")]
    Handshake(#[source] io::Error),
}

/// Open the TCP connection to `addr` (`host:port`).
pub fn connect(addr: &str) -> Result<TcpConnection, SessionError> {
    let conn = TcpConnection::connect(addr).map_err(|source| SessionError::Connect {
        addr: addr.to_string(),
        source,
    })?;
    tracing::info!(%addr, "connected to server");
    Ok(conn)
}

/// The single handshake receive: a human-readable, newline-delimited listing of
/// available files. Display only; text ends at the first NUL.
pub fn read_listing<C: Connection>(conn: &mut C, buffer_bytes: usize) -> Result<String, SessionError> {
    let raw = conn.receive(buffer_bytes).map_err(SessionError::Handshake)?;
    if raw.is_empty() {
        tracing::warn!("server sent no file listing");
    }
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}

/// Requested files minus the ledger, in requested order.
pub fn plan(cfg: &ChunkfetchConfig) -> Result<Vec<PendingItem>> {
    let ledger = Ledger::new(&cfg.ledger_file);
    let completed = ledger.load().context("load download ledger")?;
    let requested = queue::read_requested(&cfg.input_file)?;
    let pending = queue::build(&requested, &completed, cfg.ledger_match());
    tracing::info!(
        requested = requested.len(),
        completed = completed.len(),
        pending = pending.len(),
        "work queue built"
    );
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    struct Canned(Vec<u8>);

    impl Connection for Canned {
        fn send(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Ok(())
        }

        fn receive(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
            let n = self.0.len().min(max_len);
            Ok(self.0.drain(..n).collect())
        }
    }

    #[test]
    fn listing_stops_at_nul_and_buffer_size() {
        let mut conn = Canned(b"a.txt\nb.txt\n\0\0garbage".to_vec());
        assert_eq!(read_listing(&mut conn, 1024).unwrap(), "a.txt\nb.txt\n");

        let mut long = Canned(b"0123456789".to_vec());
        assert_eq!(read_listing(&mut long, 4).unwrap(), "0123");
    }

    #[test]
    fn connect_refused_is_connect_error() {
        let addr = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().to_string()
        };
        let err = connect(&addr).unwrap_err();
        assert!(matches!(err, SessionError::Connect { .. }));
        assert!(err.to_string().contains(&addr));
    }

    #[test]
    fn plan_diffs_input_against_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ChunkfetchConfig {
            input_file: dir.path().join("input.txt"),
            ledger_file: dir.path().join("downloaded_files.txt"),
            ..ChunkfetchConfig::default()
        };
        std::fs::write(&cfg.input_file, "a.txt CRITICAL\nb.txt NORMAL\nc.txt HIGH\n").unwrap();
        std::fs::write(&cfg.ledger_file, "b.txt\n").unwrap();

        let q = plan(&cfg).unwrap();
        let names: Vec<_> = q.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["a.txt", "c.txt"]);
    }

    #[test]
    fn plan_without_ledger_keeps_all() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ChunkfetchConfig {
            input_file: dir.path().join("input.txt"),
            ledger_file: dir.path().join("downloaded_files.txt"),
            ..ChunkfetchConfig::default()
        };
        std::fs::write(&cfg.input_file, "a.txt\nb.txt\n").unwrap();
        assert_eq!(plan(&cfg).unwrap().len(), 2);
    }
}
