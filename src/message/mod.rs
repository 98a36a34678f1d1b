//! Message Module
//!
//! Protocol messages and the typed builder that assembles them.
//!
//! ## Message Layout
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │  DB idx  │ Literal  │  Parameters (ordered)       │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//! The transport selects `db` and then sends `literal` followed by
//! every parameter as one binary-safe array. Parameter order is the
//! protocol contract and is never rearranged after `build`.

mod parameter;
mod builder;

pub use parameter::Parameter;
pub use builder::{BitOperation, MessageBuilder};

use crate::catalog::ReplyShape;

/// An immutable protocol message
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    db: u32,
    literal: &'static str,
    params: Vec<Parameter>,
    shape: ReplyShape,
}

impl Message {
    /// Assemble a message
    ///
    /// `shape == ReplyShape::VoidExpectOk` marks a message whose only
    /// valid non-error reply is the `OK` status.
    pub fn build(
        db: u32,
        literal: &'static str,
        params: Vec<Parameter>,
        shape: ReplyShape,
    ) -> Self {
        Self {
            db,
            literal,
            params,
            shape,
        }
    }

    pub fn db(&self) -> u32 {
        self.db
    }

    pub fn literal(&self) -> &'static str {
        self.literal
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn shape(&self) -> ReplyShape {
        self.shape
    }

    /// Only the fixed `OK` status is an acceptable reply
    pub fn expect_ok(&self) -> bool {
        self.shape == ReplyShape::VoidExpectOk
    }

    /// Same message re-targeted at a text reply shape
    pub fn into_text(mut self) -> Self {
        self.shape = self.shape.as_text();
        self
    }
}
