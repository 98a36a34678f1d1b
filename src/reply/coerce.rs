//! Reply coercion
//!
//! One function maps every (raw reply, declared shape) pair to a typed
//! value or a failure. Server errors are never coerced.

use bytes::Bytes;

use crate::catalog::ReplyShape;
use crate::error::{ClientError, Result};

use super::{RawReply, ReplyValue};

/// The fixed success status of `VoidExpectOk` operations
pub const OK_STATUS: &str = "OK";

/// Coerce `raw` into the value `shape` declares
pub fn coerce(raw: RawReply, shape: ReplyShape) -> Result<ReplyValue> {
    if let RawReply::Error(message) = raw {
        return Err(ClientError::Server(message));
    }

    match shape {
        ReplyShape::VoidExpectOk => match raw {
            RawReply::Status(ref status) if status == OK_STATUS => Ok(ReplyValue::Unit),
            other => Err(unexpected(&other, "the OK status")),
        },
        ReplyShape::Integer => match raw {
            RawReply::Integer(n) => Ok(ReplyValue::Integer(n)),
            other => Err(unexpected(&other, "an integer")),
        },
        ReplyShape::BooleanFromInteger | ReplyShape::BooleanFromStatus => match raw {
            RawReply::Integer(0) => Ok(ReplyValue::Bool(false)),
            RawReply::Integer(1) => Ok(ReplyValue::Bool(true)),
            RawReply::Integer(n) => Err(ClientError::ProtocolDecode(format!(
                "expected integer 0 or 1 for a boolean, got {}",
                n
            ))),
            other => Err(unexpected(&other, "an integer 0 or 1")),
        },
        ReplyShape::TextOrNil => match raw {
            RawReply::Status(status) => Ok(ReplyValue::Text(Some(status))),
            other => Ok(ReplyValue::Text(bulk_text(other)?)),
        },
        ReplyShape::BinaryOrNil => match raw {
            RawReply::Status(status) => Ok(ReplyValue::Binary(Some(Bytes::from(status)))),
            other => Ok(ReplyValue::Binary(bulk_binary(other)?)),
        },
        ReplyShape::ArrayOfTextOrNil => {
            let items = array_items(raw)?;
            let values = items.into_iter().map(bulk_text).collect::<Result<_>>()?;
            Ok(ReplyValue::TextArray(values))
        }
        ReplyShape::ArrayOfBinaryOrNil => {
            let items = array_items(raw)?;
            let values = items.into_iter().map(bulk_binary).collect::<Result<_>>()?;
            Ok(ReplyValue::BinaryArray(values))
        }
        ReplyShape::Float => match raw {
            RawReply::Integer(n) => Ok(ReplyValue::Float(n as f64)),
            RawReply::Bulk(Some(bytes)) => {
                let text = std::str::from_utf8(&bytes).map_err(|_| {
                    ClientError::ProtocolDecode("float reply is not valid UTF-8".to_string())
                })?;
                text.trim().parse::<f64>().map(ReplyValue::Float).map_err(|_| {
                    ClientError::ProtocolDecode(format!("invalid float reply: {:?}", text))
                })
            }
            other => Err(unexpected(&other, "a bulk decimal")),
        },
    }
}

fn unexpected(raw: &RawReply, expected: &str) -> ClientError {
    match raw {
        RawReply::Status(status) => ClientError::ProtocolDecode(format!(
            "expected {}, got status {:?}",
            expected, status
        )),
        other => {
            ClientError::ProtocolDecode(format!("expected {}, got {}", expected, other.kind()))
        }
    }
}

/// Nil bulk → `None`; present bulk → exact bytes
fn bulk_binary(raw: RawReply) -> Result<Option<Bytes>> {
    match raw {
        RawReply::Bulk(value) => Ok(value),
        RawReply::Error(message) => Err(ClientError::Server(message)),
        other => Err(unexpected(&other, "a bulk value")),
    }
}

/// Nil bulk → `None`; present bulk → its UTF-8 decoding
fn bulk_text(raw: RawReply) -> Result<Option<String>> {
    match bulk_binary(raw)? {
        None => Ok(None),
        Some(bytes) => String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|_| ClientError::ProtocolDecode("bulk reply is not valid UTF-8".to_string())),
    }
}

fn array_items(raw: RawReply) -> Result<Vec<RawReply>> {
    match raw {
        RawReply::Array(Some(items)) => Ok(items),
        other => Err(unexpected(&other, "an array")),
    }
}
