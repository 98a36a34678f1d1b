//! Operation and reply-shape definitions

use std::fmt;

/// Canonical, protocol-independent operation names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    GetRange,
    Set,
    SetNx,
    SetEx,
    PSetEx,
    GetSet,
    GetDel,
    MGet,
    MSet,
    MSetNx,
    Incr,
    IncrBy,
    Decr,
    DecrBy,
    IncrByFloat,
    Append,
    StrLen,
    SetRange,
    GetBit,
    SetBit,
    BitCount,
    BitOp,
    Del,
    Exists,
    Expire,
    Persist,
    HDel,
    Ping,
    Info,
}

impl Operation {
    /// Every operation the catalog knows about
    pub const ALL: [Operation; 30] = [
        Operation::Get,
        Operation::GetRange,
        Operation::Set,
        Operation::SetNx,
        Operation::SetEx,
        Operation::PSetEx,
        Operation::GetSet,
        Operation::GetDel,
        Operation::MGet,
        Operation::MSet,
        Operation::MSetNx,
        Operation::Incr,
        Operation::IncrBy,
        Operation::Decr,
        Operation::DecrBy,
        Operation::IncrByFloat,
        Operation::Append,
        Operation::StrLen,
        Operation::SetRange,
        Operation::GetBit,
        Operation::SetBit,
        Operation::BitCount,
        Operation::BitOp,
        Operation::Del,
        Operation::Exists,
        Operation::Expire,
        Operation::Persist,
        Operation::HDel,
        Operation::Ping,
        Operation::Info,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Declared shape of an operation's successful reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyShape {
    /// Only the fixed `OK` status is acceptable
    VoidExpectOk,
    /// Signed 64-bit integer, passed through unchanged
    Integer,
    /// Integer 0 or 1
    BooleanFromInteger,
    /// Bulk value decoded as UTF-8, nil as absent
    TextOrNil,
    /// Bulk value as raw bytes, nil as absent
    BinaryOrNil,
    /// Array of bulk values decoded as UTF-8, nil elements as absent
    ArrayOfTextOrNil,
    /// Array of bulk values as raw bytes, nil elements as absent
    ArrayOfBinaryOrNil,
    /// Conditional set: count of keys affected, 0 or 1
    BooleanFromStatus,
    /// Bulk decimal text parsed as a double
    Float,
}

impl ReplyShape {
    /// Swap a binary shape for its text counterpart
    pub fn as_text(self) -> ReplyShape {
        match self {
            ReplyShape::BinaryOrNil => ReplyShape::TextOrNil,
            ReplyShape::ArrayOfBinaryOrNil => ReplyShape::ArrayOfTextOrNil,
            other => other,
        }
    }
}
