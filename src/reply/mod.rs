//! Reply Module
//!
//! Untyped replies as read from the transport, and their coercion into
//! the typed value an operation declared.
//!
//! ## Raw Reply Kinds
//! - Integer: signed 64-bit
//! - Status: simple status line (`OK`, `PONG`, ...)
//! - Bulk: binary-safe value, or nil (absent)
//! - Array: ordered elements, or nil
//! - Error: server-provided message text

mod raw;
mod coerce;

pub use raw::{RawReply, ReplyValue};
pub use coerce::{coerce, OK_STATUS};
