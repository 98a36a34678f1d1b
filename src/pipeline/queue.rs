//! Pipeline queue
//!
//! Holding area for operations not yet handed to the transport.
//!
//! Two FIFO lanes: priority submissions drain before normal ones, and each
//! lane keeps submission order. Both ends are O(1).

use std::collections::VecDeque;

use crate::message::Message;

use super::{Completer, OperationId};

/// A submitted message awaiting transmission
#[derive(Debug)]
pub struct PendingOperation {
    pub id: OperationId,
    pub message: Message,
    pub completer: Completer,
    pub priority: bool,
}

/// Ordered backlog of not-yet-transmitted operations
#[derive(Debug, Default)]
pub struct PipelineQueue {
    /// Queue-jump submissions, FIFO among themselves
    priority: VecDeque<PendingOperation>,

    /// Normal submissions, FIFO
    normal: VecDeque<PendingOperation>,
}

impl PipelineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append, or queue-jump when `operation.priority` is set
    ///
    /// A priority operation lands ahead of every normal operation still
    /// queued, behind earlier priority operations.
    pub fn push(&mut self, operation: PendingOperation) {
        if operation.priority {
            self.priority.push_back(operation);
        } else {
            self.normal.push_back(operation);
        }
    }

    /// Take the next operation to transmit
    pub fn pop_front(&mut self) -> Option<PendingOperation> {
        self.priority
            .pop_front()
            .or_else(|| self.normal.pop_front())
    }

    /// Remove a queued operation by id
    pub fn remove(&mut self, id: OperationId) -> Option<PendingOperation> {
        for lane in [&mut self.priority, &mut self.normal] {
            if let Some(index) = lane.iter().position(|op| op.id == id) {
                return lane.remove(index);
            }
        }
        None
    }

    /// Take every queued operation, in transmission order
    pub fn drain(&mut self) -> Vec<PendingOperation> {
        let mut drained: Vec<PendingOperation> = self.priority.drain(..).collect();
        drained.extend(self.normal.drain(..));
        drained
    }

    /// Ids in the order they would be transmitted
    pub fn order(&self) -> Vec<OperationId> {
        self.priority
            .iter()
            .chain(self.normal.iter())
            .map(|op| op.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.priority.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.normal.is_empty()
    }
}
