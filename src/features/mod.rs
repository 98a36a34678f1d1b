//! Features Module
//!
//! Negotiated server-version snapshot and the capability flags derived from it.
//!
//! ## Lifecycle
//! - Created once per negotiated connection
//! - Read-only thereafter (all flags computed at construction)
//! - Replaced wholesale on reconnect/renegotiation
//!
//! ## Thresholds
//! ```text
//! 2.1.0   SUBSTR renamed to GETRANGE
//! 2.1.2   PERSIST, STRLEN
//! 2.1.3   EXPIRE overwrites an existing TTL
//! 2.1.8   SETRANGE
//! 2.4.0   variadic HDEL
//! 2.6.0   BITOP/BITCOUNT, INCRBYFLOAT, PSETEX
//! 2.6.12  SET with NX/XX/EX/PX options
//! 6.2.0   GETDEL
//! ```

mod version;
mod set;
pub mod thresholds;

pub use version::Version;
pub use set::FeatureSet;
