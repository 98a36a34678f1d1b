//! Protocol Module
//!
//! RESP2 wire codec used by the TCP transport.
//!
//! ## Request Format
//! Every request is an array of bulk strings:
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<literal>\r\n
//! $<len>\r\n<param 1>\r\n
//! ...
//! ```
//!
//! ## Reply Types
//! - `+` status line
//! - `-` error line
//! - `:` integer
//! - `$` bulk string (`$-1` is nil)
//! - `*` array (`*-1` is nil)

mod codec;

pub use codec::{
    encode_reply, encode_request, encode_select, read_reply, write_request, MAX_ARRAY_LEN,
    MAX_BULK_LEN, MAX_DEPTH,
};
