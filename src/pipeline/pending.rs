//! Pending results
//!
//! A single-fulfillment slot: the `Completer` is consumed when it settles,
//! the `Pending` handle observes the outcome.

use std::fmt;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::error::{ClientError, Result};
use crate::reply::ReplyValue;

/// Submission-order identifier of one operation on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Create a linked completer/handle pair
pub fn pending_pair(id: OperationId) -> (Completer, Pending<ReplyValue>) {
    let (tx, rx) = channel::bounded(1);
    (
        Completer { id, tx },
        Pending {
            id,
            rx,
            extract: Ok,
        },
    )
}

/// Write side of a pending result
#[derive(Debug)]
pub struct Completer {
    id: OperationId,
    tx: Sender<Result<ReplyValue>>,
}

impl Completer {
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// Settle the result; consumes the completer
    pub fn complete(self, result: Result<ReplyValue>) {
        // The handle may already be gone; nobody is left to tell.
        if self.tx.send(result).is_err() {
            tracing::trace!("Result for {} dropped: handle released", self.id);
        }
    }
}

/// Read side of a pending result, typed as `T`
///
/// The outcome can be observed once. A completer dropped without settling
/// reads as a connectivity failure.
pub struct Pending<T> {
    id: OperationId,
    rx: Receiver<Result<ReplyValue>>,
    extract: fn(ReplyValue) -> Result<T>,
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("id", &self.id).finish()
    }
}

impl Pending<ReplyValue> {
    /// Narrow the untyped result with `extract`
    pub fn typed<T>(self, extract: fn(ReplyValue) -> Result<T>) -> Pending<T> {
        Pending {
            id: self.id,
            rx: self.rx,
            extract,
        }
    }
}

impl<T> Pending<T> {
    /// A handle that is already settled
    pub fn ready(
        id: OperationId,
        result: Result<ReplyValue>,
        extract: fn(ReplyValue) -> Result<T>,
    ) -> Self {
        let (completer, pending) = pending_pair(id);
        completer.complete(result);
        pending.retype(extract)
    }

    fn retype<U>(self, extract: fn(ReplyValue) -> Result<U>) -> Pending<U> {
        Pending {
            id: self.id,
            rx: self.rx,
            extract,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    /// Block until the operation settles
    pub fn wait(self) -> Result<T> {
        match self.rx.recv() {
            Ok(result) => result.and_then(self.extract),
            Err(_) => Err(abandoned(self.id)),
        }
    }

    /// Block for at most `timeout`; `None` if still pending
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result.and_then(self.extract)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(abandoned(self.id))),
        }
    }

    /// Non-blocking poll; `None` if still pending
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result.and_then(self.extract)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(abandoned(self.id))),
        }
    }
}

fn abandoned(id: OperationId) -> ClientError {
    ClientError::Connectivity(format!("operation {} abandoned by the dispatcher", id))
}
