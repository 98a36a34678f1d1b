//! Client
//!
//! One typed method per supported operation. Every method takes a database
//! index, its arguments and a priority flag, and returns immediately with a
//! `Pending` result of the operation's declared shape.
//!
//! ```no_run
//! use atlas_client::{Client, Config};
//!
//! let client = Client::connect(&Config::default())?;
//! let set = client.set(0, "greeting", "hello", false);
//! let get = client.get_string(0, "greeting", false);
//! set.wait()?;
//! assert_eq!(get.wait()?, Some("hello".to_string()));
//! # Ok::<(), atlas_client::ClientError>(())
//! ```

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::features::FeatureSet;
use crate::message::{BitOperation, Message, MessageBuilder, Parameter};
use crate::network;
use crate::pipeline::{Dispatcher, MessageSink, OperationId, Pending, ReplySource};
use crate::reply::ReplyValue;

/// A client bound to one connection
///
/// `Client` is `Sync`; share it across threads by reference or `Arc`.
pub struct Client {
    dispatcher: Dispatcher,

    /// Shared, read-only command table
    catalog: Arc<Catalog>,

    /// Negotiated capabilities; `None` while the version is unknown
    features: RwLock<Option<FeatureSet>>,
}

impl Client {
    /// Connect over TCP using `config`
    ///
    /// With no pinned `server_version` and `negotiate_version` on, the
    /// server version is read from `INFO server` (sent at priority). A
    /// failed negotiation leaves the feature set unknown.
    pub fn connect(config: &Config) -> Result<Self> {
        let (sink, source) = network::connect(config)?;
        let features = config.server_version.map(FeatureSet::new);
        let client = Self::with_transport(sink, source, Arc::new(Catalog::standard()), features)?;

        if features.is_none() && config.negotiate_version {
            client.negotiate();
        }

        Ok(client)
    }

    /// Run on an already established transport
    pub fn with_transport<S, R>(
        sink: S,
        source: R,
        catalog: Arc<Catalog>,
        features: Option<FeatureSet>,
    ) -> Result<Self>
    where
        S: MessageSink + 'static,
        R: ReplySource + 'static,
    {
        Ok(Self {
            dispatcher: Dispatcher::start(sink, source)?,
            catalog,
            features: RwLock::new(features),
        })
    }

    /// Query the server version and replace the feature set
    ///
    /// Returns the new feature set, or `None` when the reply carried no
    /// parsable version.
    pub fn negotiate(&self) -> Option<FeatureSet> {
        match self.info(0, Some("server"), true).wait() {
            Ok(Some(info)) => {
                let negotiated = FeatureSet::from_info(&info);
                match negotiated {
                    Some(features) => {
                        tracing::info!("Negotiated server version {}", features.version());
                        *self.features.write() = Some(features);
                    }
                    None => tracing::warn!("INFO reply carried no redis_version"),
                }
                negotiated
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Version negotiation failed: {}", e);
                None
            }
        }
    }

    /// Current feature set
    pub fn features(&self) -> Option<FeatureSet> {
        *self.features.read()
    }

    /// Replace the feature set wholesale
    pub fn set_features(&self, features: Option<FeatureSet>) {
        *self.features.write() = features;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Submit a pre-built message
    pub fn submit(&self, message: Message, priority: bool) -> Pending<ReplyValue> {
        self.dispatcher.submit(message, priority)
    }

    /// Remove a not-yet-transmitted operation; see [`Dispatcher::cancel`]
    pub fn cancel(&self, id: OperationId) -> bool {
        self.dispatcher.cancel(id)
    }

    /// Fail everything pending and stop the connection
    pub fn close(&mut self) {
        self.dispatcher.close();
    }

    pub fn is_closed(&self) -> bool {
        self.dispatcher.is_closed()
    }

    fn dispatch<T>(
        &self,
        priority: bool,
        extract: fn(ReplyValue) -> Result<T>,
        build: impl FnOnce(&MessageBuilder<'_>) -> Result<Message>,
    ) -> Pending<T> {
        let features = self.features();
        let builder = MessageBuilder::new(&self.catalog, features.as_ref());

        match build(&builder) {
            Ok(message) => self.dispatcher.submit(message, priority).typed(extract),
            Err(e) => self.dispatcher.reject(e).typed(extract),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<Option<Bytes>> {
        self.dispatch(priority, ReplyValue::into_binary, |b| b.get(db, key))
    }

    pub fn get_string(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<Option<String>> {
        self.dispatch(priority, ReplyValue::into_text, |b| {
            b.get(db, key).map(Message::into_text)
        })
    }

    pub fn get_range(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        start: i64,
        end: i64,
        priority: bool,
    ) -> Pending<Option<Bytes>> {
        self.dispatch(priority, ReplyValue::into_binary, |b| {
            b.get_range(db, key, start, end)
        })
    }

    pub fn get_range_string(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        start: i64,
        end: i64,
        priority: bool,
    ) -> Pending<Option<String>> {
        self.dispatch(priority, ReplyValue::into_text, |b| {
            b.get_range(db, key, start, end).map(Message::into_text)
        })
    }

    pub fn get_set(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<Option<Bytes>> {
        self.dispatch(priority, ReplyValue::into_binary, |b| {
            b.get_set(db, key, value)
        })
    }

    pub fn get_del(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<Option<Bytes>> {
        self.dispatch(priority, ReplyValue::into_binary, |b| b.get_del(db, key))
    }

    /// Multi-key read; positions match `keys`
    pub fn mget<K, I>(&self, db: u32, keys: I, priority: bool) -> Pending<Vec<Option<Bytes>>>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        self.dispatch(priority, ReplyValue::into_binary_array, |b| b.mget(db, keys))
    }

    pub fn mget_strings<K, I>(
        &self,
        db: u32,
        keys: I,
        priority: bool,
    ) -> Pending<Vec<Option<String>>>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        self.dispatch(priority, ReplyValue::into_text_array, |b| {
            b.mget(db, keys).map(Message::into_text)
        })
    }

    pub fn strlen(&self, db: u32, key: impl Into<Parameter>, priority: bool) -> Pending<i64> {
        self.dispatch(priority, ReplyValue::into_integer, |b| b.strlen(db, key))
    }

    pub fn get_bit(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        offset: u32,
        priority: bool,
    ) -> Pending<bool> {
        self.dispatch(priority, ReplyValue::into_bool, |b| {
            b.get_bit(db, key, offset)
        })
    }

    pub fn bit_count(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        range: Option<(i64, i64)>,
        priority: bool,
    ) -> Pending<i64> {
        self.dispatch(priority, ReplyValue::into_integer, |b| {
            b.bit_count(db, key, range)
        })
    }

    pub fn exists(&self, db: u32, key: impl Into<Parameter>, priority: bool) -> Pending<bool> {
        self.dispatch(priority, ReplyValue::into_bool, |b| b.exists(db, key))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn set(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<()> {
        self.dispatch(priority, ReplyValue::into_unit, |b| b.set(db, key, value))
    }

    /// Set if absent; `true` when the key was written
    pub fn set_nx(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<bool> {
        self.dispatch(priority, ReplyValue::into_bool, |b| b.set_nx(db, key, value))
    }

    pub fn set_ex(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        seconds: i64,
        priority: bool,
    ) -> Pending<()> {
        self.dispatch(priority, ReplyValue::into_unit, |b| {
            b.set_ex(db, key, value, seconds)
        })
    }

    pub fn pset_ex(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        millis: i64,
        priority: bool,
    ) -> Pending<()> {
        self.dispatch(priority, ReplyValue::into_unit, |b| {
            b.pset_ex(db, key, value, millis)
        })
    }

    pub fn mset<K, V, I>(&self, db: u32, pairs: I, priority: bool) -> Pending<()>
    where
        K: Into<Parameter>,
        V: Into<Parameter>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.dispatch(priority, ReplyValue::into_unit, |b| b.mset(db, pairs))
    }

    /// Set all pairs only if none of the keys exist
    pub fn mset_nx<K, V, I>(&self, db: u32, pairs: I, priority: bool) -> Pending<bool>
    where
        K: Into<Parameter>,
        V: Into<Parameter>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.dispatch(priority, ReplyValue::into_bool, |b| b.mset_nx(db, pairs))
    }

    /// Append; resolves to the new length
    pub fn append(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        value: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<i64> {
        self.dispatch(priority, ReplyValue::into_integer, |b| b.append(db, key, value))
    }

    pub fn set_range(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        offset: u32,
        value: impl Into<Parameter>,
        priority: bool,
    ) -> Pending<i64> {
        self.dispatch(priority, ReplyValue::into_integer, |b| {
            b.set_range(db, key, offset, value)
        })
    }

    /// Set a bit; resolves to the bit's previous value
    pub fn set_bit(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        offset: u32,
        value: bool,
        priority: bool,
    ) -> Pending<bool> {
        self.dispatch(priority, ReplyValue::into_bool, |b| {
            b.set_bit(db, key, offset, value)
        })
    }

    /// Resolves to the length of the destination value
    pub fn bit_op<K, I>(
        &self,
        db: u32,
        operation: BitOperation,
        destination: impl Into<Parameter>,
        sources: I,
        priority: bool,
    ) -> Pending<i64>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        self.dispatch(priority, ReplyValue::into_integer, |b| {
            b.bit_op(db, operation, destination, sources)
        })
    }

    // =========================================================================
    // Counters
    // =========================================================================

    /// Resolves to the value after the increment
    pub fn increment(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        amount: i64,
        priority: bool,
    ) -> Pending<i64> {
        self.dispatch(priority, ReplyValue::into_integer, |b| {
            b.increment(db, key, amount)
        })
    }

    /// Resolves to the value after the decrement
    pub fn decrement(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        amount: i64,
        priority: bool,
    ) -> Pending<i64> {
        self.dispatch(priority, ReplyValue::into_integer, |b| {
            b.decrement(db, key, amount)
        })
    }

    pub fn increment_float(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        amount: f64,
        priority: bool,
    ) -> Pending<f64> {
        self.dispatch(priority, ReplyValue::into_float, |b| {
            b.increment_float(db, key, amount)
        })
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Resolves to the number of keys removed
    pub fn del<K, I>(&self, db: u32, keys: I, priority: bool) -> Pending<i64>
    where
        K: Into<Parameter>,
        I: IntoIterator<Item = K>,
    {
        self.dispatch(priority, ReplyValue::into_integer, |b| b.del(db, keys))
    }

    pub fn expire(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        seconds: i64,
        priority: bool,
    ) -> Pending<bool> {
        self.dispatch(priority, ReplyValue::into_bool, |b| b.expire(db, key, seconds))
    }

    pub fn persist(&self, db: u32, key: impl Into<Parameter>, priority: bool) -> Pending<bool> {
        self.dispatch(priority, ReplyValue::into_bool, |b| b.persist(db, key))
    }

    /// Resolves to the number of fields removed
    pub fn hdel<F, I>(
        &self,
        db: u32,
        key: impl Into<Parameter>,
        fields: I,
        priority: bool,
    ) -> Pending<i64>
    where
        F: Into<Parameter>,
        I: IntoIterator<Item = F>,
    {
        self.dispatch(priority, ReplyValue::into_integer, |b| b.hdel(db, key, fields))
    }

    // =========================================================================
    // Server
    // =========================================================================

    pub fn ping(&self, db: u32, priority: bool) -> Pending<Option<String>> {
        self.dispatch(priority, ReplyValue::into_text, |b| b.ping(db))
    }

    pub fn info(&self, db: u32, section: Option<&str>, priority: bool) -> Pending<Option<String>> {
        self.dispatch(priority, ReplyValue::into_text, |b| b.info(db, section))
    }
}
