//! Minimal framed file server for integration tests.
//!
//! Sends a newline-delimited listing on connect, then answers each
//! `"<filename> <priority>"` request with BEGN/DATA.../END, or ERRO for
//! unknown names. Records are written one at a time with a short pause so
//! each client receive sees exactly one record.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chunkfetch_core::frame::{Frame, PAYLOAD_CAPACITY};

const RECORD_GAP: Duration = Duration::from_millis(20);

pub struct FileServer {
    pub addr: String,
    /// Requests received, in order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

/// Serve `files` to a single client, closing the connection after `max_requests` requests.
pub fn start(files: HashMap<String, Vec<u8>>, max_requests: usize) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap().to_string();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            serve(stream, &files, max_requests, &log);
        }
    });
    FileServer { addr, requests }
}

fn serve(
    mut stream: TcpStream,
    files: &HashMap<String, Vec<u8>>,
    max_requests: usize,
    log: &Mutex<Vec<String>>,
) {
    let _ = stream.set_nodelay(true);
    let mut names: Vec<&String> = files.keys().collect();
    names.sort();
    let listing: String = names.iter().map(|n| format!("{n}\n")).collect();
    if stream.write_all(listing.as_bytes()).is_err() {
        return;
    }

    let mut buf = [0u8; 512];
    for _ in 0..max_requests {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        let request = String::from_utf8_lossy(&buf[..n]).into_owned();
        log.lock().unwrap().push(request.clone());
        let name = request.split_whitespace().next().unwrap_or("").to_string();

        let records = match files.get(&name) {
            Some(body) => {
                let mut r = vec![Frame::Begin {
                    filename: name.clone(),
                    size: body.len() as u64,
                }
                .to_record()];
                r.extend(
                    body.chunks(PAYLOAD_CAPACITY)
                        .map(|c| Frame::Data { payload: c }.to_record()),
                );
                r.push(Frame::End { filename: name }.to_record());
                r
            }
            None => vec![Frame::Error.to_record()],
        };
        for rec in records {
            thread::sleep(RECORD_GAP);
            if stream.write_all(&rec).is_err() {
                return;
            }
        }
    }
}
