//! Message builder
//!
//! Turns typed domain arguments into `Message`s, resolving each literal
//! against the catalog and the negotiated feature set.

use crate::catalog::{Catalog, Operation};
use crate::error::{ClientError, Result};
use crate::features::FeatureSet;

use super::{Message, Parameter};

/// Bitwise operator for `BITOP`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOperation {
    And,
    Or,
    Xor,
    Not,
}

impl BitOperation {
    fn token(self) -> &'static str {
        match self {
            BitOperation::And => "AND",
            BitOperation::Or => "OR",
            BitOperation::Xor => "XOR",
            BitOperation::Not => "NOT",
        }
    }
}

/// Builds messages for one connection's feature set
///
/// Cheap to construct; holds only borrows.
#[derive(Debug, Clone, Copy)]
pub struct MessageBuilder<'a> {
    catalog: &'a Catalog,
    features: Option<&'a FeatureSet>,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(catalog: &'a Catalog, features: Option<&'a FeatureSet>) -> Self {
        Self { catalog, features }
    }

    /// Resolve `operation` and assemble it with its declared shape
    fn build(&self, db: u32, operation: Operation, params: Vec<Parameter>) -> Result<Message> {
        let literal = self.catalog.resolve(operation, self.features)?;
        let shape = self.catalog.shape(operation)?;
        Ok(Message::build(db, literal, params, shape))
    }

    fn single_key(&self, db: u32, operation: Operation, key: Parameter) -> Result<Message> {
        self.build(db, operation, vec![key])
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get(&self, db: u32, key: impl Into<Parameter>) -> Result<Message> {
        self.single_key(db, Operation::Get, key.into())
    }

    /// Substring of the value; `SUBSTR` on servers older than 2.1.0
    pub fn get_range(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        start: i64,
        end: i64,
    ) -> Result<Message> {
        self.build(
            db,
            Operation::GetRange,
            vec![key.into(), start.into(), end.into()],
        )
    }

    pub fn get_set(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
    ) -> Result<Message> {
        self.build(db, Operation::GetSet, vec![key.into(), value.into()])
    }

    pub fn get_del(&self, db: u32, key: impl Into<Parameter>) -> Result<Message> {
        self.single_key(db, Operation::GetDel, key.into())
    }

    /// Multi-key read; reply positions follow `keys` order
    pub fn mget<K, I>(&self, db: u32, keys: I) -> Result<Message>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        let params = collect_non_empty(keys, "MGET")?;
        self.build(db, Operation::MGet, params)
    }

    pub fn strlen(&self, db: u32, key: impl Into<Parameter>) -> Result<Message> {
        self.single_key(db, Operation::StrLen, key.into())
    }

    pub fn get_bit(&self, db: u32, key: impl Into<Parameter>, offset: u32) -> Result<Message> {
        self.build(db, Operation::GetBit, vec![key.into(), offset.into()])
    }

    /// Count set bits, optionally within a byte range
    pub fn bit_count(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        range: Option<(i64, i64)>,
    ) -> Result<Message> {
        let mut params = vec![key.into()];
        if let Some((start, end)) = range {
            params.push(start.into());
            params.push(end.into());
        }
        self.build(db, Operation::BitCount, params)
    }

    pub fn exists(&self, db: u32, key: impl Into<Parameter>) -> Result<Message> {
        self.single_key(db, Operation::Exists, key.into())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn set(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
    ) -> Result<Message> {
        self.build(db, Operation::Set, vec![key.into(), value.into()])
    }

    /// Set only if the key does not exist
    pub fn set_nx(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
    ) -> Result<Message> {
        self.build(db, Operation::SetNx, vec![key.into(), value.into()])
    }

    /// Set with a TTL in seconds
    pub fn set_ex(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        seconds: i64,
    ) -> Result<Message> {
        if seconds <= 0 {
            return Err(ClientError::InvalidArgument(format!(
                "SETEX expiry must be positive, got {}",
                seconds
            )));
        }
        self.build(
            db,
            Operation::SetEx,
            vec![key.into(), seconds.into(), value.into()],
        )
    }

    /// Set with a TTL in milliseconds
    pub fn pset_ex(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        millis: i64,
    ) -> Result<Message> {
        if millis <= 0 {
            return Err(ClientError::InvalidArgument(format!(
                "PSETEX expiry must be positive, got {}",
                millis
            )));
        }
        self.build(
            db,
            Operation::PSetEx,
            vec![key.into(), millis.into(), value.into()],
        )
    }

    /// Multi-key set
    ///
    /// Flattened as alternating key, value: `params[2i]` is always the key
    /// of `params[2i + 1]`.
    pub fn mset<K, V, I>(&self, db: u32, pairs: I) -> Result<Message>
    where
        K: Into<Parameter>,
        V: Into<Parameter>,
        I: IntoIterator<Item = (K, V)>,
    {
        let params = flatten_pairs(pairs, "MSET")?;
        self.build(db, Operation::MSet, params)
    }

    /// Multi-key set, only if none of the keys exist
    pub fn mset_nx<K, V, I>(&self, db: u32, pairs: I) -> Result<Message>
    where
        K: Into<Parameter>,
        V: Into<Parameter>,
        I: IntoIterator<Item = (K, V)>,
    {
        let params = flatten_pairs(pairs, "MSETNX")?;
        self.build(db, Operation::MSetNx, params)
    }

    pub fn append(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
    ) -> Result<Message> {
        self.build(db, Operation::Append, vec![key.into(), value.into()])
    }

    pub fn set_range(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        offset: u32,
        value: impl Into<Parameter>,
    ) -> Result<Message> {
        self.build(
            db,
            Operation::SetRange,
            vec![key.into(), offset.into(), value.into()],
        )
    }

    pub fn set_bit(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        offset: u32,
        value: bool,
    ) -> Result<Message> {
        self.build(
            db,
            Operation::SetBit,
            vec![key.into(), offset.into(), i64::from(value).into()],
        )
    }

    /// Bitwise operation over `sources`, stored at `destination`
    pub fn bit_op<K, I>(
        &self,
        db: u32,
        operation: BitOperation,
        destination: impl Into<Parameter>,
        sources: I,
    ) -> Result<Message>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        let sources = collect_non_empty(sources, "BITOP")?;
        if operation == BitOperation::Not && sources.len() != 1 {
            return Err(ClientError::InvalidArgument(format!(
                "BITOP NOT takes exactly one source key, got {}",
                sources.len()
            )));
        }

        let mut params = Vec::with_capacity(sources.len() + 2);
        params.push(Parameter::Text(operation.token().to_string()));
        params.push(destination.into());
        params.extend(sources);
        self.build(db, Operation::BitOp, params)
    }

    // =========================================================================
    // Counters
    // =========================================================================

    /// Increment by `amount`
    ///
    /// `1` and `-1` use the single-step `INCR`/`DECR` literals; every other
    /// amount goes through `INCRBY`.
    pub fn increment(&self, db: u32, key: impl Into<Parameter>, amount: i64) -> Result<Message> {
        match amount {
            1 => self.single_key(db, Operation::Incr, key.into()),
            -1 => self.single_key(db, Operation::Decr, key.into()),
            _ => self.build(db, Operation::IncrBy, vec![key.into(), amount.into()]),
        }
    }

    /// Decrement by `amount`
    ///
    /// `1` and `-1` use the single-step `DECR`/`INCR` literals; every other
    /// amount is sent as `INCRBY` with the amount negated. `i64::MIN` has no
    /// negation and falls back to `DECRBY`.
    pub fn decrement(&self, db: u32, key: impl Into<Parameter>, amount: i64) -> Result<Message> {
        match amount {
            1 => self.single_key(db, Operation::Decr, key.into()),
            -1 => self.single_key(db, Operation::Incr, key.into()),
            _ => match amount.checked_neg() {
                Some(neg) => self.build(db, Operation::IncrBy, vec![key.into(), neg.into()]),
                None => self.build(db, Operation::DecrBy, vec![key.into(), amount.into()]),
            },
        }
    }

    pub fn increment_float(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        amount: f64,
    ) -> Result<Message> {
        if !amount.is_finite() {
            return Err(ClientError::InvalidArgument(format!(
                "INCRBYFLOAT amount must be finite, got {}",
                amount
            )));
        }
        self.build(
            db,
            Operation::IncrByFloat,
            vec![key.into(), Parameter::Text(amount.to_string())],
        )
    }

    // =========================================================================
    // Keys
    // =========================================================================

    pub fn del<K, I>(&self, db: u32, keys: I) -> Result<Message>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        let params = collect_non_empty(keys, "DEL")?;
        self.build(db, Operation::Del, params)
    }

    pub fn expire(&self, db: u32, key: impl Into<Parameter>, seconds: i64) -> Result<Message> {
        self.build(db, Operation::Expire, vec![key.into(), seconds.into()])
    }

    pub fn persist(&self, db: u32, key: impl Into<Parameter>) -> Result<Message> {
        self.single_key(db, Operation::Persist, key.into())
    }

    /// Delete hash fields
    ///
    /// More than one field needs a server with variadic `HDEL`.
    pub fn hdel<F, I>(&self, db: u32, key: impl Into<Parameter>, fields: I) -> Result<Message>
    where
        F: Into<Parameter>,
        I: IntoIterator<Item = F>,
    {
        let fields = collect_non_empty(fields, "HDEL")?;
        if fields.len() > 1 {
            if let Some(features) = self.features {
                if !features.hash_variadic_delete() {
                    return Err(ClientError::UnsupportedOperation(format!(
                        "HDEL with {} fields requires variadic delete (connected: {})",
                        fields.len(),
                        features.version()
                    )));
                }
            }
        }

        let mut params = Vec::with_capacity(fields.len() + 1);
        params.push(key.into());
        params.extend(fields);
        self.build(db, Operation::HDel, params)
    }

    // =========================================================================
    // Server
    // =========================================================================

    pub fn ping(&self, db: u32) -> Result<Message> {
        self.build(db, Operation::Ping, Vec::new())
    }

    pub fn info(&self, db: u32, section: Option<&str>) -> Result<Message> {
        let params = section.map(Parameter::from).into_iter().collect();
        self.build(db, Operation::Info, params)
    }
}

fn collect_non_empty<K, I>(items: I, command: &str) -> Result<Vec<Parameter>>
where
    K: Into<Parameter>,
    I: IntoIterator<Item = K>,
{
    let params: Vec<Parameter> = items.into_iter().map(Into::into).collect();
    if params.is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "{} requires at least one key",
            command
        )));
    }
    Ok(params)
}

fn flatten_pairs<K, V, I>(pairs: I, command: &str) -> Result<Vec<Parameter>>
where
    K: Into<Parameter>,
    V: Into<Parameter>,
    I: IntoIterator<Item = (K, V)>,
{
    let pairs = pairs.into_iter();
    let mut params = Vec::with_capacity(pairs.size_hint().0 * 2);
    for (key, value) in pairs {
        params.push(key.into());
        params.push(value.into());
    }

    if params.is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "{} requires at least one key/value pair",
            command
        )));
    }
    Ok(params)
}
