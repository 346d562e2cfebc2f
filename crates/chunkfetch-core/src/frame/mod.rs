//! Response frame codec.
//!
//! A record is a 4-byte ASCII tag followed by up to [`PAYLOAD_CAPACITY`]
//! body bytes. Nothing about host memory layout crosses the wire:
//!
//! | tag    | body                                  |
//! |--------|---------------------------------------|
//! | `BEGN` | ASCII `"<filename> <sizeBytes>"`      |
//! | `DATA` | raw file bytes                        |
//! | `END ` | ASCII `"<filename>"`                  |
//! | `ERRO` | ignored                               |
//!
//! Text bodies end at the first NUL byte, if any.

mod decode;

pub use decode::{decode, FrameParseError};

/// Length of the status tag that prefixes every record.
pub const TAG_LEN: usize = 4;
/// Maximum body bytes per record.
pub const PAYLOAD_CAPACITY: usize = 1024;
/// Largest record the client asks the connection for.
pub const RECORD_SIZE: usize = TAG_LEN + PAYLOAD_CAPACITY;

pub const TAG_BEGIN: &[u8; TAG_LEN] = b"BEGN";
pub const TAG_DATA: &[u8; TAG_LEN] = b"DATA";
pub const TAG_END: &[u8; TAG_LEN] = b"END ";
pub const TAG_ERROR: &[u8; TAG_LEN] = b"ERRO";

/// One decoded response record. `Data` borrows the record buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<'a> {
    Begin { filename: String, size: u64 },
    Data { payload: &'a [u8] },
    End { filename: String },
    Error,
    /// Unrecognized tag or a record shorter than a tag. Ignored by the scheduler.
    Unknown,
}

impl Frame<'_> {
    /// Encode as a wire record (used by tests and tooling that play the server side).
    pub fn to_record(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RECORD_SIZE);
        match self {
            Frame::Begin { filename, size } => {
                out.extend_from_slice(TAG_BEGIN);
                out.extend_from_slice(format!("{filename} {size}").as_bytes());
            }
            Frame::Data { payload } => {
                out.extend_from_slice(TAG_DATA);
                out.extend_from_slice(payload);
            }
            Frame::End { filename } => {
                out.extend_from_slice(TAG_END);
                out.extend_from_slice(filename.as_bytes());
            }
            Frame::Error => out.extend_from_slice(TAG_ERROR),
            Frame::Unknown => out.extend_from_slice(b"????"),
        }
        out
    }

    /// Body length of a DATA frame (record length minus tag), 0 otherwise.
    pub fn payload_len(&self) -> usize {
        match self {
            Frame::Data { payload } => payload.len(),
            _ => 0,
        }
    }
}
