//! Feature set
//!
//! Capability booleans computed once from a negotiated `Version`.

use super::thresholds;
use super::Version;

/// Immutable snapshot of what the connected server supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    version: Version,

    substr_renamed_getrange: bool,
    persist: bool,
    string_length: bool,
    expire_overwrite: bool,
    string_set_range: bool,
    hash_variadic_delete: bool,
    bitwise_operations: bool,
    increment_float: bool,
    millisecond_expiry: bool,
    set_conditional: bool,
    get_delete: bool,
}

impl FeatureSet {
    /// Derive every capability flag from `version`
    pub fn new(version: Version) -> Self {
        Self {
            version,
            substr_renamed_getrange: version >= thresholds::GETRANGE,
            persist: version >= thresholds::PERSIST,
            string_length: version >= thresholds::STRLEN,
            expire_overwrite: version >= thresholds::EXPIRE_OVERWRITE,
            string_set_range: version >= thresholds::SETRANGE,
            hash_variadic_delete: version >= thresholds::HDEL_VARIADIC,
            bitwise_operations: version >= thresholds::BITWISE,
            increment_float: version >= thresholds::INCRBYFLOAT,
            millisecond_expiry: version >= thresholds::MILLISECOND_EXPIRY,
            set_conditional: version >= thresholds::SET_CONDITIONAL,
            get_delete: version >= thresholds::GETDEL,
        }
    }

    /// Build from the text of an `INFO` reply
    ///
    /// Looks for the `redis_version:` line; returns `None` when it is
    /// missing or malformed.
    pub fn from_info(info: &str) -> Option<Self> {
        info.lines()
            .filter_map(|line| line.trim().strip_prefix("redis_version:"))
            .find_map(|raw| raw.parse::<Version>().ok())
            .map(Self::new)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// `GETRANGE` replaces the legacy `SUBSTR` literal
    pub fn substr_renamed_getrange(&self) -> bool {
        self.substr_renamed_getrange
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    pub fn string_length(&self) -> bool {
        self.string_length
    }

    /// `EXPIRE` on a key that already has a TTL overwrites it
    pub fn expire_overwrite(&self) -> bool {
        self.expire_overwrite
    }

    pub fn string_set_range(&self) -> bool {
        self.string_set_range
    }

    /// `HDEL` accepts more than one field
    pub fn hash_variadic_delete(&self) -> bool {
        self.hash_variadic_delete
    }

    pub fn bitwise_operations(&self) -> bool {
        self.bitwise_operations
    }

    pub fn increment_float(&self) -> bool {
        self.increment_float
    }

    pub fn millisecond_expiry(&self) -> bool {
        self.millisecond_expiry
    }

    pub fn set_conditional(&self) -> bool {
        self.set_conditional
    }

    pub fn get_delete(&self) -> bool {
        self.get_delete
    }
}
