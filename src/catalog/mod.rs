//! Catalog Module
//!
//! Static table of operation → protocol literal(s) and declared reply shape.
//!
//! ## Literal Selection
//! Each descriptor lists its literals oldest-first, each with the minimum
//! server version that understands it:
//! ```text
//! GetRange ── ("SUBSTR",   0.0.0)
//!          └─ ("GETRANGE", 2.1.0)
//! ```
//! `resolve` picks the newest literal whose requirement the negotiated
//! `FeatureSet` meets. With no feature set, the oldest literal is used.

mod operation;
mod table;

pub use operation::{Operation, ReplyShape};
pub use table::{Catalog, CommandDescriptor, Literal};
