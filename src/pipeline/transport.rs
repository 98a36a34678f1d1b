//! Transport boundary
//!
//! The dispatcher drives one connection split into a write half and a
//! read half, each owned by its own thread.

use crate::error::Result;
use crate::message::Message;
use crate::reply::RawReply;

/// Write half: encodes and sends messages
pub trait MessageSink: Send {
    /// Encode `message` (db selector, literal, parameters) and send it
    fn send(&mut self, message: &Message) -> Result<()>;

    /// Stop the connection
    ///
    /// After this returns, the paired `ReplySource` must fail its pending
    /// and future `next_reply` calls.
    fn shutdown(&mut self) {}
}

/// Read half: yields decoded replies in send order
pub trait ReplySource: Send {
    /// Block until the next reply unit is decoded
    fn next_reply(&mut self) -> Result<RawReply>;
}
