//! Ordered byte-stream connection to the file server.
//!
//! The scheduler only needs `send` and `receive`; tests drive it with a
//! scripted in-memory connection, production uses [`TcpConnection`].

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

/// A single, ordered, bidirectional byte stream.
pub trait Connection {
    /// Send all of `bytes`.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Receive at most `max_len` bytes. An empty vector means the peer closed
    /// the stream.
    fn receive(&mut self, max_len: usize) -> io::Result<Vec<u8>>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).send(bytes)
    }

    fn receive(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).receive(max_len)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).send(bytes)
    }

    fn receive(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).receive(max_len)
    }
}

/// Blocking TCP connection. Each `receive` is one `read` call, so record
/// boundaries follow the sender's writes; there is no read timeout.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }
}

impl Connection for TcpConnection {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn receive(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max_len];
        let n = loop {
            match self.stream.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        buf.truncate(n);
        Ok(buf)
    }
}
