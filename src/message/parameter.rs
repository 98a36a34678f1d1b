//! Message parameters
//!
//! Tagged values that serialize to binary-safe wire arguments.

use bytes::Bytes;

/// One message argument
///
/// `Text` and `Binary` holding the same bytes are indistinguishable on
/// the wire; integers are written as their decimal text.
#[derive(Debug, Clone)]
pub enum Parameter {
    Integer(i64),
    Text(String),
    Binary(Bytes),
}

impl Parameter {
    /// Exact bytes this parameter puts on the wire
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Parameter::Integer(n) => Bytes::from(n.to_string()),
            Parameter::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            Parameter::Binary(b) => b.clone(),
        }
    }

    /// Encoded length in bytes
    pub fn wire_len(&self) -> usize {
        match self {
            Parameter::Integer(n) => n.to_string().len(),
            Parameter::Text(s) => s.len(),
            Parameter::Binary(b) => b.len(),
        }
    }
}

/// Equality is defined on wire bytes, so `Text("a") == Binary(b"a")`.
impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Parameter::Integer(a), Parameter::Integer(b)) => a == b,
            (Parameter::Text(a), Parameter::Text(b)) => a == b,
            (Parameter::Binary(a), Parameter::Binary(b)) => a == b,
            _ => self.to_bytes() == other.to_bytes(),
        }
    }
}

impl Eq for Parameter {}

impl PartialEq<&str> for Parameter {
    fn eq(&self, other: &&str) -> bool {
        self.to_bytes() == other.as_bytes()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Integer(value)
    }
}

impl From<u32> for Parameter {
    fn from(value: u32) -> Self {
        Parameter::Integer(i64::from(value))
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::Text(value.to_string())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::Text(value)
    }
}

impl From<&String> for Parameter {
    fn from(value: &String) -> Self {
        Parameter::Text(value.clone())
    }
}

impl From<Bytes> for Parameter {
    fn from(value: Bytes) -> Self {
        Parameter::Binary(value)
    }
}

impl From<&[u8]> for Parameter {
    fn from(value: &[u8]) -> Self {
        Parameter::Binary(Bytes::copy_from_slice(value))
    }
}

impl<const N: usize> From<&[u8; N]> for Parameter {
    fn from(value: &[u8; N]) -> Self {
        Parameter::Binary(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(value: Vec<u8>) -> Self {
        Parameter::Binary(Bytes::from(value))
    }
}
