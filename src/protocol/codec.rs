//! Protocol codec
//!
//! Encoding of requests and decoding of replies for the RESP2 wire format.

use std::io::{BufRead, Read, Write};

use bytes::Bytes;

use crate::error::{ClientError, Result};
use crate::message::Message;
use crate::reply::RawReply;

/// Maximum bulk string size (512 MB, the server's own limit)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Maximum number of elements accepted in one reply array
pub const MAX_ARRAY_LEN: usize = 16 * 1024 * 1024;

/// Maximum nesting of arrays inside one reply
pub const MAX_DEPTH: usize = 64;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a message as a RESP array: literal first, then parameters
///
/// The database index is not part of the request; the transport emits a
/// separate `SELECT` when it changes.
pub fn encode_request(message: &Message) -> Vec<u8> {
    let params = message.params();
    let payload_len: usize = message.literal().len()
        + params.iter().map(|p| p.wire_len() + 16).sum::<usize>();

    let mut buf = Vec::with_capacity(16 + payload_len);
    push_header(&mut buf, b'*', (params.len() + 1) as i64);
    push_bulk(&mut buf, message.literal().as_bytes());
    for param in params {
        push_bulk(&mut buf, &param.to_bytes());
    }
    buf
}

/// Encode `SELECT <db>`
pub fn encode_select(db: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32);
    push_header(&mut buf, b'*', 2);
    push_bulk(&mut buf, b"SELECT");
    push_bulk(&mut buf, db.to_string().as_bytes());
    buf
}

/// Write one request to a stream
pub fn write_request<W: Write>(writer: &mut W, message: &Message) -> Result<()> {
    writer.write_all(&encode_request(message))?;
    writer.flush()?;
    Ok(())
}

fn push_header(buf: &mut Vec<u8>, kind: u8, n: i64) {
    buf.push(kind);
    buf.extend_from_slice(n.to_string().as_bytes());
    buf.extend_from_slice(CRLF);
}

fn push_bulk(buf: &mut Vec<u8>, data: &[u8]) {
    push_header(buf, b'$', data.len() as i64);
    buf.extend_from_slice(data);
    buf.extend_from_slice(CRLF);
}

// =============================================================================
// Reply Encoding (server side; used by test servers)
// =============================================================================

/// Encode a reply in RESP2
pub fn encode_reply(reply: &RawReply) -> Vec<u8> {
    let mut buf = Vec::new();
    push_reply(&mut buf, reply);
    buf
}

fn push_reply(buf: &mut Vec<u8>, reply: &RawReply) {
    match reply {
        RawReply::Status(s) => {
            buf.push(b'+');
            buf.extend_from_slice(s.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        RawReply::Error(msg) => {
            buf.push(b'-');
            buf.extend_from_slice(msg.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        RawReply::Integer(n) => push_header(buf, b':', *n),
        RawReply::Bulk(Some(data)) => push_bulk(buf, data),
        RawReply::Bulk(None) => push_header(buf, b'$', -1),
        RawReply::Array(None) => push_header(buf, b'*', -1),
        RawReply::Array(Some(items)) => {
            push_header(buf, b'*', items.len() as i64);
            for item in items {
                push_reply(buf, item);
            }
        }
    }
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Read one complete reply from a stream
///
/// Blocks until a full reply is buffered. A clean end of stream before the
/// first byte surfaces as `UnexpectedEof`.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<RawReply> {
    read_reply_at(reader, 0)
}

fn read_reply_at<R: BufRead>(reader: &mut R, depth: usize) -> Result<RawReply> {
    if depth > MAX_DEPTH {
        return Err(ClientError::ProtocolDecode(format!(
            "reply nesting too deep (max {})",
            MAX_DEPTH
        )));
    }

    let line = read_line(reader)?;
    let (&kind, rest) = line
        .split_first()
        .ok_or_else(|| ClientError::ProtocolDecode("empty reply line".to_string()))?;

    match kind {
        b'+' => Ok(RawReply::Status(line_text(rest)?)),
        b'-' => Ok(RawReply::Error(line_text(rest)?)),
        b':' => Ok(RawReply::Integer(parse_int(rest)?)),
        b'$' => {
            let len = parse_int(rest)?;
            if len < 0 {
                return Ok(RawReply::Bulk(None));
            }
            let len = checked_len(len, MAX_BULK_LEN, "Bulk")?;

            let mut data = vec![0u8; len + CRLF.len()];
            reader.read_exact(&mut data)?;
            if &data[len..] != CRLF {
                return Err(ClientError::ProtocolDecode(
                    "bulk string not terminated by CRLF".to_string(),
                ));
            }
            data.truncate(len);
            Ok(RawReply::Bulk(Some(Bytes::from(data))))
        }
        b'*' => {
            let len = parse_int(rest)?;
            if len < 0 {
                return Ok(RawReply::Array(None));
            }
            let len = checked_len(len, MAX_ARRAY_LEN, "Array")?;

            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(read_reply_at(reader, depth + 1)?);
            }
            Ok(RawReply::Array(Some(items)))
        }
        other => Err(ClientError::ProtocolDecode(format!(
            "Unknown reply type byte: 0x{:02x}",
            other
        ))),
    }
}

/// Read a CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(ClientError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed by server",
        )));
    }
    if !line.ends_with(CRLF) {
        return Err(ClientError::ProtocolDecode(
            "reply line not terminated by CRLF".to_string(),
        ));
    }
    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

fn line_text(raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec())
        .map_err(|_| ClientError::ProtocolDecode("reply line is not valid UTF-8".to_string()))
}

fn parse_int(raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            ClientError::ProtocolDecode(format!(
                "invalid integer in reply: {:?}",
                String::from_utf8_lossy(raw)
            ))
        })
}

fn checked_len(len: i64, max: usize, what: &str) -> Result<usize> {
    let len = len as usize;
    if len > max {
        return Err(ClientError::ProtocolDecode(format!(
            "{} too large: {} (max {})",
            what, len, max
        )));
    }
    Ok(len)
}
