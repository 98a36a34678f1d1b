//! Command table
//!
//! The process-wide, read-only operation → literal mapping.

use std::collections::HashMap;

use crate::error::{ClientError, Result};
use crate::features::{thresholds, FeatureSet, Version};

use super::{Operation, ReplyShape};

/// One protocol literal and the oldest server version that accepts it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub text: &'static str,
    pub min_version: Version,
}

impl Literal {
    const fn any(text: &'static str) -> Self {
        Self {
            text,
            min_version: Version::ZERO,
        }
    }

    const fn since(text: &'static str, min_version: Version) -> Self {
        Self { text, min_version }
    }
}

/// Static description of one operation
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub operation: Operation,

    /// Literals ordered oldest-first; never empty
    pub literals: &'static [Literal],

    /// Declared reply shape
    pub shape: ReplyShape,
}

impl CommandDescriptor {
    /// Oldest literal (conservative fallback)
    pub fn oldest(&self) -> &Literal {
        &self.literals[0]
    }
}

/// Immutable command catalog
///
/// Built once (usually via [`Catalog::standard`]) and shared by reference.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptors: HashMap<Operation, CommandDescriptor>,
}

/// (operation, literals oldest-first, reply shape)
const STANDARD_TABLE: &[(Operation, &[Literal], ReplyShape)] = &[
    (Operation::Get, &[Literal::any("GET")], ReplyShape::BinaryOrNil),
    (
        Operation::GetRange,
        &[Literal::any("SUBSTR"), Literal::since("GETRANGE", thresholds::GETRANGE)],
        ReplyShape::BinaryOrNil,
    ),
    (Operation::Set, &[Literal::any("SET")], ReplyShape::VoidExpectOk),
    (Operation::SetNx, &[Literal::any("SETNX")], ReplyShape::BooleanFromStatus),
    (Operation::SetEx, &[Literal::any("SETEX")], ReplyShape::VoidExpectOk),
    (
        Operation::PSetEx,
        &[Literal::since("PSETEX", thresholds::MILLISECOND_EXPIRY)],
        ReplyShape::VoidExpectOk,
    ),
    (Operation::GetSet, &[Literal::any("GETSET")], ReplyShape::BinaryOrNil),
    (Operation::GetDel, &[Literal::since("GETDEL", thresholds::GETDEL)], ReplyShape::BinaryOrNil),
    (Operation::MGet, &[Literal::any("MGET")], ReplyShape::ArrayOfBinaryOrNil),
    (Operation::MSet, &[Literal::any("MSET")], ReplyShape::VoidExpectOk),
    (Operation::MSetNx, &[Literal::any("MSETNX")], ReplyShape::BooleanFromStatus),
    (Operation::Incr, &[Literal::any("INCR")], ReplyShape::Integer),
    (Operation::IncrBy, &[Literal::any("INCRBY")], ReplyShape::Integer),
    (Operation::Decr, &[Literal::any("DECR")], ReplyShape::Integer),
    (Operation::DecrBy, &[Literal::any("DECRBY")], ReplyShape::Integer),
    (
        Operation::IncrByFloat,
        &[Literal::since("INCRBYFLOAT", thresholds::INCRBYFLOAT)],
        ReplyShape::Float,
    ),
    (Operation::Append, &[Literal::any("APPEND")], ReplyShape::Integer),
    (Operation::StrLen, &[Literal::since("STRLEN", thresholds::STRLEN)], ReplyShape::Integer),
    (Operation::SetRange, &[Literal::since("SETRANGE", thresholds::SETRANGE)], ReplyShape::Integer),
    (Operation::GetBit, &[Literal::any("GETBIT")], ReplyShape::BooleanFromInteger),
    (Operation::SetBit, &[Literal::any("SETBIT")], ReplyShape::BooleanFromInteger),
    (Operation::BitCount, &[Literal::since("BITCOUNT", thresholds::BITWISE)], ReplyShape::Integer),
    (Operation::BitOp, &[Literal::since("BITOP", thresholds::BITWISE)], ReplyShape::Integer),
    (Operation::Del, &[Literal::any("DEL")], ReplyShape::Integer),
    (Operation::Exists, &[Literal::any("EXISTS")], ReplyShape::BooleanFromInteger),
    (Operation::Expire, &[Literal::any("EXPIRE")], ReplyShape::BooleanFromInteger),
    (
        Operation::Persist,
        &[Literal::since("PERSIST", thresholds::PERSIST)],
        ReplyShape::BooleanFromInteger,
    ),
    (Operation::HDel, &[Literal::any("HDEL")], ReplyShape::Integer),
    (Operation::Ping, &[Literal::any("PING")], ReplyShape::TextOrNil),
    (Operation::Info, &[Literal::any("INFO")], ReplyShape::TextOrNil),
];

impl Catalog {
    /// The catalog of every supported operation
    pub fn standard() -> Self {
        let descriptors = STANDARD_TABLE
            .iter()
            .map(|&(operation, literals, shape)| {
                (
                    operation,
                    CommandDescriptor {
                        operation,
                        literals,
                        shape,
                    },
                )
            })
            .collect();

        Self { descriptors }
    }

    /// Look up an operation's descriptor
    pub fn descriptor(&self, operation: Operation) -> Result<&CommandDescriptor> {
        self.descriptors.get(&operation).ok_or_else(|| {
            ClientError::UnsupportedOperation(format!("{} is not in the catalog", operation))
        })
    }

    /// Resolve the literal to send for `operation`
    ///
    /// Picks the newest literal whose minimum version is met by `features`.
    /// With `features == None` (version unknown) the oldest literal is used
    /// unconditionally. Fails when the server is known to predate every
    /// literal of the operation.
    pub fn resolve(
        &self,
        operation: Operation,
        features: Option<&FeatureSet>,
    ) -> Result<&'static str> {
        let descriptor = self.descriptor(operation)?;

        let Some(features) = features else {
            return Ok(descriptor.oldest().text);
        };

        let version = features.version();
        descriptor
            .literals
            .iter()
            .rev()
            .find(|literal| version.at_least(literal.min_version))
            .map(|literal| literal.text)
            .ok_or_else(|| {
                ClientError::UnsupportedOperation(format!(
                    "{} requires server {} or newer (connected: {})",
                    operation,
                    descriptor.oldest().min_version,
                    version
                ))
            })
    }

    /// Declared reply shape of `operation`
    pub fn shape(&self, operation: Operation) -> Result<ReplyShape> {
        Ok(self.descriptor(operation)?.shape)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
