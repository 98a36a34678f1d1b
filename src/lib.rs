//! # Atlas Client
//!
//! Command-dispatch core for a Redis-style key-value client:
//! - Feature-gated command selection from a negotiated server version
//! - Typed message construction (binary-safe parameters)
//! - Priority ("queue-jump") pipeline over a single connection
//! - Strict FIFO reply correlation and typed reply coercion
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Client (typed methods)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Catalog::resolve(op, FeatureSet)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   MessageBuilder → Message                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  submit(message, priority)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │        Dispatcher: PipelineQueue → writer → awaiting         │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ MessageSink::send                │ ReplySource::next_reply
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │  TCP write half │                │  TCP read half  │
//!   └─────────────────┘                └────────┬────────┘
//!                                               ▼
//!                                      coerce(raw, shape) → Pending<T>
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod features;
pub mod catalog;
pub mod message;
pub mod reply;
pub mod pipeline;
pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, Result};
pub use config::Config;
pub use features::{FeatureSet, Version};
pub use catalog::{Catalog, Operation, ReplyShape};
pub use message::{Message, Parameter};
pub use reply::{RawReply, ReplyValue};
pub use pipeline::{Dispatcher, Pending};
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the Atlas client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
