use super::{Frame, TAG_BEGIN, TAG_DATA, TAG_END, TAG_ERROR, TAG_LEN};

/// A recognized record whose body could not be parsed. The frame is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameParseError {
    #[error("BEGN record has no file name")]
    MissingFilename,
    #[error("BEGN record for {filename} has no size")]
    MissingSize { filename: String },
    #[error("BEGN record for {filename} has invalid size {raw:?}")]
    InvalidSize { filename: String, raw: String },
    #[error("END record has no file name")]
    MissingEndFilename,
}

/// Decode one received record. Unrecognized tags decode to [`Frame::Unknown`].
pub fn decode(record: &[u8]) -> Result<Frame<'_>, FrameParseError> {
    if record.len() < TAG_LEN {
        return Ok(Frame::Unknown);
    }
    let (tag, body) = record.split_at(TAG_LEN);
    if tag == TAG_DATA {
        Ok(Frame::Data { payload: body })
    } else if tag == TAG_BEGIN {
        decode_begin(body)
    } else if tag == TAG_END {
        let filename = text_body(body)
            .split_whitespace()
            .next()
            .ok_or(FrameParseError::MissingEndFilename)?
            .to_string();
        Ok(Frame::End { filename })
    } else if tag == TAG_ERROR {
        Ok(Frame::Error)
    } else {
        Ok(Frame::Unknown)
    }
}

fn decode_begin(body: &[u8]) -> Result<Frame<'static>, FrameParseError> {
    let text = text_body(body);
    let mut tokens = text.split_whitespace();
    let filename = tokens
        .next()
        .ok_or(FrameParseError::MissingFilename)?
        .to_string();
    let raw = tokens
        .next()
        .ok_or_else(|| FrameParseError::MissingSize {
            filename: filename.clone(),
        })?;
    let size = raw.parse::<u64>().map_err(|_| FrameParseError::InvalidSize {
        filename: filename.clone(),
        raw: raw.to_string(),
    })?;
    Ok(Frame::Begin { filename, size })
}

/// Body as text, cut at the first NUL (C-string padding).
fn text_body(body: &[u8]) -> std::borrow::Cow<'_, str> {
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    String::from_utf8_lossy(&body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PAYLOAD_CAPACITY;

    #[test]
    fn begin_header() {
        let f = decode(b"BEGNa.txt 100").unwrap();
        assert_eq!(
            f,
            Frame::Begin {
                filename: "a.txt".into(),
                size: 100
            }
        );
    }

    #[test]
    fn begin_header_with_nul_padding() {
        let mut rec = b"BEGNmovie.mkv 5242880".to_vec();
        rec.resize(4 + PAYLOAD_CAPACITY, 0);
        rec[40] = b'x'; // garbage after the terminator is ignored
        let f = decode(&rec).unwrap();
        assert_eq!(
            f,
            Frame::Begin {
                filename: "movie.mkv".into(),
                size: 5_242_880
            }
        );
    }

    #[test]
    fn begin_bad_size() {
        assert_eq!(
            decode(b"BEGNa.txt lots").unwrap_err(),
            FrameParseError::InvalidSize {
                filename: "a.txt".into(),
                raw: "lots".into()
            }
        );
        assert!(matches!(
            decode(b"BEGNa.txt -5").unwrap_err(),
            FrameParseError::InvalidSize { .. }
        ));
        assert!(matches!(
            decode(b"BEGNa.txt").unwrap_err(),
            FrameParseError::MissingSize { .. }
        ));
        assert_eq!(
            decode(b"BEGN   ").unwrap_err(),
            FrameParseError::MissingFilename
        );
    }

    #[test]
    fn data_payload_is_record_minus_tag() {
        let rec = [b"DATA".as_slice(), &[0u8, 1, 2, 0, 255]].concat();
        let f = decode(&rec).unwrap();
        assert_eq!(f.payload_len(), rec.len() - TAG_LEN);
        assert_eq!(f, Frame::Data { payload: &[0, 1, 2, 0, 255] });
        assert_eq!(decode(b"DATA").unwrap().payload_len(), 0);
    }

    #[test]
    fn end_and_error() {
        assert_eq!(
            decode(b"END a.txt\0\0\0").unwrap(),
            Frame::End {
                filename: "a.txt".into()
            }
        );
        assert_eq!(
            decode(b"END ").unwrap_err(),
            FrameParseError::MissingEndFilename
        );
        assert_eq!(decode(b"ERRO").unwrap(), Frame::Error);
        assert_eq!(decode(b"ERROfile not found").unwrap(), Frame::Error);
    }

    #[test]
    fn unknown_tags_never_fail() {
        assert_eq!(decode(b"").unwrap(), Frame::Unknown);
        assert_eq!(decode(b"BEG").unwrap(), Frame::Unknown);
        assert_eq!(decode(b"ENDXa.txt").unwrap(), Frame::Unknown);
        assert_eq!(decode(b"data1234").unwrap(), Frame::Unknown);
    }

    #[test]
    fn encoded_records_decode_back() {
        let begin = Frame::Begin {
            filename: "b.bin".into(),
            size: 7,
        };
        assert_eq!(decode(&begin.to_record()).unwrap(), begin);
        let end = Frame::End {
            filename: "b.bin".into(),
        };
        assert_eq!(decode(&end.to_record()).unwrap(), end);
        assert_eq!(decode(&Frame::Error.to_record()).unwrap(), Frame::Error);
    }
}
