//! Raw and typed reply values

use std::fmt;

use bytes::Bytes;

use crate::error::{ClientError, Result};

/// One decoded reply unit, before coercion
#[derive(Debug, Clone, PartialEq)]
pub enum RawReply {
    Integer(i64),
    Status(String),
    Bulk(Option<Bytes>),
    Array(Option<Vec<RawReply>>),
    Error(String),
}

impl RawReply {
    /// Short kind name used in decode error messages
    pub fn kind(&self) -> &'static str {
        match self {
            RawReply::Integer(_) => "integer",
            RawReply::Status(_) => "status",
            RawReply::Bulk(Some(_)) => "bulk",
            RawReply::Bulk(None) => "nil bulk",
            RawReply::Array(Some(_)) => "array",
            RawReply::Array(None) => "nil array",
            RawReply::Error(_) => "error",
        }
    }
}

impl fmt::Display for RawReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawReply::Integer(n) => write!(f, "(integer) {}", n),
            RawReply::Status(s) => write!(f, "{}", s),
            RawReply::Bulk(Some(b)) => match std::str::from_utf8(b) {
                Ok(s) => write!(f, "\"{}\"", s),
                Err(_) => write!(f, "{:?}", b),
            },
            RawReply::Bulk(None) | RawReply::Array(None) => write!(f, "(nil)"),
            RawReply::Array(Some(items)) => {
                if items.is_empty() {
                    return write!(f, "(empty array)");
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            RawReply::Error(msg) => write!(f, "(error) {}", msg),
        }
    }
}

/// A reply coerced to its declared shape
///
/// One variant per result kind; `Pending<T>` narrows it to `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyValue {
    Unit,
    Integer(i64),
    Bool(bool),
    Float(f64),
    Text(Option<String>),
    Binary(Option<Bytes>),
    TextArray(Vec<Option<String>>),
    BinaryArray(Vec<Option<Bytes>>),
}

impl ReplyValue {
    fn mismatch(&self, expected: &str) -> ClientError {
        ClientError::ProtocolDecode(format!("expected {} result, got {:?}", expected, self))
    }

    pub fn into_unit(self) -> Result<()> {
        match self {
            ReplyValue::Unit => Ok(()),
            other => Err(other.mismatch("unit")),
        }
    }

    pub fn into_integer(self) -> Result<i64> {
        match self {
            ReplyValue::Integer(n) => Ok(n),
            other => Err(other.mismatch("integer")),
        }
    }

    pub fn into_bool(self) -> Result<bool> {
        match self {
            ReplyValue::Bool(b) => Ok(b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn into_float(self) -> Result<f64> {
        match self {
            ReplyValue::Float(x) => Ok(x),
            other => Err(other.mismatch("float")),
        }
    }

    pub fn into_text(self) -> Result<Option<String>> {
        match self {
            ReplyValue::Text(s) => Ok(s),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn into_binary(self) -> Result<Option<Bytes>> {
        match self {
            ReplyValue::Binary(b) => Ok(b),
            other => Err(other.mismatch("binary")),
        }
    }

    pub fn into_text_array(self) -> Result<Vec<Option<String>>> {
        match self {
            ReplyValue::TextArray(items) => Ok(items),
            other => Err(other.mismatch("text array")),
        }
    }

    pub fn into_binary_array(self) -> Result<Vec<Option<Bytes>>> {
        match self {
            ReplyValue::BinaryArray(items) => Ok(items),
            other => Err(other.mismatch("binary array")),
        }
    }
}
