//! Dispatcher
//!
//! The single transmission path of a connection.
//!
//! ## Concurrency Model
//! - **Submitters** (any thread): push into the queue under `state` and
//!   wake the writer. Never block on I/O.
//! - **Writer** (one thread): pops the queue head, records it as awaiting,
//!   then sends. Recording happens under the same lock as the pop, so the
//!   awaiting record is always in transmission order.
//! - **Reader** (one thread): pairs each reply with the oldest awaiting
//!   operation and settles it.
//!
//! A transport failure closes the connection: every queued and awaiting
//! operation settles with `ClientError::Connectivity`. Nothing is retried.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::catalog::ReplyShape;
use crate::error::{ClientError, Result};
use crate::message::Message;
use crate::reply::{coerce, ReplyValue};

use super::{
    pending_pair, Completer, MessageSink, OperationId, Pending, PendingOperation, PipelineQueue,
    ReplySource,
};

/// A transmitted operation waiting for its reply
struct InFlight {
    shape: ReplyShape,
    completer: Completer,
}

/// All shared mutable state of a connection
struct State {
    queue: PipelineQueue,
    awaiting: VecDeque<InFlight>,
    /// Set once; the reason every later submission fails with
    closed: Option<String>,
}

struct Shared {
    state: Mutex<State>,
    /// Signalled on submit and on close
    wake: Condvar,
    next_id: AtomicU64,
}

impl Shared {
    /// Close the connection and fail everything still pending
    fn fail_all(&self, reason: &str) {
        let (queued, awaiting) = {
            let mut state = self.state.lock();
            if state.closed.is_none() {
                state.closed = Some(reason.to_string());
            }
            let queued = state.queue.drain();
            let awaiting: Vec<InFlight> = state.awaiting.drain(..).collect();
            self.wake.notify_all();
            (queued, awaiting)
        };

        if !queued.is_empty() || !awaiting.is_empty() {
            tracing::warn!(
                "Connection closed ({}): failing {} queued and {} awaiting operations",
                reason,
                queued.len(),
                awaiting.len()
            );
        }

        for inflight in awaiting {
            inflight
                .completer
                .complete(Err(ClientError::Connectivity(reason.to_string())));
        }
        for op in queued {
            op.completer
                .complete(Err(ClientError::Connectivity(reason.to_string())));
        }
    }
}

/// Owns the writer and reader threads of one connection
pub struct Dispatcher {
    shared: Arc<Shared>,
    writer: Option<JoinHandle<()>>,
    reader: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Start draining onto `sink` and correlating replies from `source`
    pub fn start<S, R>(sink: S, source: R) -> Result<Self>
    where
        S: MessageSink + 'static,
        R: ReplySource + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: PipelineQueue::new(),
                awaiting: VecDeque::new(),
                closed: None,
            }),
            wake: Condvar::new(),
            next_id: AtomicU64::new(1),
        });

        let writer = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("atlas-writer".to_string())
                .spawn(move || write_loop(shared, sink))?
        };

        let reader = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("atlas-reader".to_string())
                .spawn(move || read_loop(shared, source))
        };

        let reader = match reader {
            Ok(handle) => handle,
            Err(e) => {
                shared.fail_all("reader thread failed to start");
                let _ = writer.join();
                return Err(e.into());
            }
        };

        tracing::debug!("Dispatcher started");

        Ok(Self {
            shared,
            writer: Some(writer),
            reader: Some(reader),
        })
    }

    /// Queue `message`; returns immediately with its pending result
    ///
    /// `priority` jumps ahead of every not-yet-transmitted normal
    /// operation; already transmitted operations are never reordered.
    pub fn submit(&self, message: Message, priority: bool) -> Pending<ReplyValue> {
        let id = OperationId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let (completer, pending) = pending_pair(id);

        let mut state = self.shared.state.lock();
        if let Some(reason) = state.closed.as_ref() {
            let error = ClientError::Connectivity(reason.clone());
            drop(state);
            completer.complete(Err(error));
            return pending;
        }

        tracing::trace!(
            "Queued {} {} (db {}, priority {})",
            id,
            message.literal(),
            message.db(),
            priority
        );
        state.queue.push(PendingOperation {
            id,
            message,
            completer,
            priority,
        });
        self.shared.wake.notify_one();

        pending
    }

    /// A handle already settled with `error`, for operations that failed
    /// before they could be queued
    pub fn reject(&self, error: ClientError) -> Pending<ReplyValue> {
        let id = OperationId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        Pending::ready(id, Err(error), Ok)
    }

    /// Remove a not-yet-transmitted operation
    ///
    /// Its result settles with `ClientError::Cancelled`. Returns `false`
    /// when the operation was already transmitted (or unknown).
    pub fn cancel(&self, id: OperationId) -> bool {
        let removed = self.shared.state.lock().queue.remove(id);
        match removed {
            Some(op) => {
                tracing::trace!("Cancelled {} before transmission", id);
                op.completer.complete(Err(ClientError::Cancelled));
                true
            }
            None => false,
        }
    }

    /// Number of operations not yet transmitted
    pub fn queued(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Number of transmitted operations awaiting their reply
    pub fn awaiting(&self) -> usize {
        self.shared.state.lock().awaiting.len()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed.is_some()
    }

    /// Close the connection and join both threads
    ///
    /// Every queued and awaiting operation settles with a connectivity
    /// failure. Idempotent.
    pub fn close(&mut self) {
        self.shared.fail_all("connection closed");

        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                tracing::warn!("Writer thread panicked");
            }
        }
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                tracing::warn!("Reader thread panicked");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

// =============================================================================
// Worker loops
// =============================================================================

fn write_loop<S: MessageSink>(shared: Arc<Shared>, mut sink: S) {
    loop {
        let op = {
            let mut state = shared.state.lock();
            let next = loop {
                if state.closed.is_some() {
                    break None;
                }
                if let Some(op) = state.queue.pop_front() {
                    break Some(op);
                }
                shared.wake.wait(&mut state);
            };

            next.map(|op| {
                state.awaiting.push_back(InFlight {
                    shape: op.message.shape(),
                    completer: op.completer,
                });
                (op.id, op.message)
            })
        };

        let Some((id, message)) = op else {
            break;
        };

        tracing::trace!("Sending {} {}", id, message.literal());
        if let Err(e) = sink.send(&message) {
            tracing::warn!("Send failed for {}: {}", id, e);
            shared.fail_all(&format!("send failed: {}", e));
            break;
        }
    }

    sink.shutdown();
    tracing::debug!("Writer stopped");
}

fn read_loop<R: ReplySource>(shared: Arc<Shared>, mut source: R) {
    loop {
        let raw = match source.next_reply() {
            Ok(raw) => raw,
            Err(e) => {
                let already_closed = shared.state.lock().closed.is_some();
                if !already_closed {
                    tracing::warn!("Receive failed: {}", e);
                }
                shared.fail_all(&format!("receive failed: {}", e));
                break;
            }
        };

        let (inflight, closed) = {
            let mut state = shared.state.lock();
            (state.awaiting.pop_front(), state.closed.is_some())
        };

        match inflight {
            Some(inflight) => {
                tracing::trace!("Reply for {}: {}", inflight.completer.id(), raw.kind());
                inflight.completer.complete(coerce(raw, inflight.shape));
            }
            // Late reply after close; its operation already failed.
            None if closed => break,
            None => {
                tracing::warn!("Unsolicited {} reply with nothing awaiting", raw.kind());
                shared.fail_all("protocol violation: unsolicited reply");
                break;
            }
        }
    }

    tracing::debug!("Reader stopped");
}
