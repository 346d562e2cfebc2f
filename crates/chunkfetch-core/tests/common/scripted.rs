//! In-memory connection that replays a fixed sequence of response records.

use std::collections::VecDeque;
use std::io;

use chunkfetch_core::connection::Connection;
use chunkfetch_core::control::CancelToken;
use chunkfetch_core::frame::Frame;

pub struct ScriptedConnection {
    records: VecDeque<Vec<u8>>,
    pub sent: Vec<String>,
    /// Set once the last scripted record has been handed out.
    cancel_when_drained: Option<CancelToken>,
}

impl ScriptedConnection {
    pub fn new(frames: &[Frame<'_>]) -> Self {
        Self {
            records: frames.iter().map(Frame::to_record).collect(),
            sent: Vec::new(),
            cancel_when_drained: None,
        }
    }

    pub fn cancel_when_drained(mut self, token: CancelToken) -> Self {
        self.cancel_when_drained = Some(token);
        self
    }
}

impl Connection for ScriptedConnection {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sent.push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    fn receive(&mut self, _max_len: usize) -> io::Result<Vec<u8>> {
        let next = self.records.pop_front().unwrap_or_default();
        if self.records.is_empty() {
            if let Some(token) = &self.cancel_when_drained {
                token.cancel();
            }
        }
        Ok(next)
    }
}
