//! Version thresholds
//!
//! The first server version that supports each gated capability. Both the
//! `FeatureSet` flags and the catalog's literal gates read from this table,
//! so the two can never disagree.

use super::Version;

/// `SUBSTR` renamed to `GETRANGE`
pub const GETRANGE: Version = Version::new(2, 1, 0);
pub const PERSIST: Version = Version::new(2, 1, 2);
pub const STRLEN: Version = Version::new(2, 1, 2);
/// `EXPIRE` overwrites an existing TTL
pub const EXPIRE_OVERWRITE: Version = Version::new(2, 1, 3);
pub const SETRANGE: Version = Version::new(2, 1, 8);
/// `HDEL` with more than one field
pub const HDEL_VARIADIC: Version = Version::new(2, 4, 0);
/// `BITOP` and `BITCOUNT`
pub const BITWISE: Version = Version::new(2, 6, 0);
pub const INCRBYFLOAT: Version = Version::new(2, 6, 0);
/// `PSETEX`
pub const MILLISECOND_EXPIRY: Version = Version::new(2, 6, 0);
/// `SET` with `NX`/`XX`/`EX`/`PX` options
pub const SET_CONDITIONAL: Version = Version::new(2, 6, 12);
pub const GETDEL: Version = Version::new(6, 2, 0);
