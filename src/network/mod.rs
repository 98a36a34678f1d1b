//! Network Module
//!
//! Blocking TCP transport for the dispatcher.
//!
//! ## Architecture
//! - One `TcpStream`, cloned into a write half and a read half
//! - `TcpSink` writes requests (plus `SELECT` on database changes)
//! - `TcpSource` reads replies, swallowing the `SELECT` acknowledgements

mod connection;

pub use connection::{connect, TcpSink, TcpSource};
