//! Server version
//!
//! Comparable `major.minor.patch` value used by every version threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Semantic server version, ordered field by field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// The universally supported baseline (oldest literals carry this)
    pub const ZERO: Version = Version::new(0, 0, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// True when `self` meets the `minimum` requirement
    pub fn at_least(&self, minimum: Version) -> bool {
        *self >= minimum
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ClientError;

    /// Parse `"x"`, `"x.y"` or `"x.y.z"`; trailing pre-release tags
    /// (`"7.2.4-rc1"`) and missing components are tolerated.
    fn from_str(s: &str) -> Result<Self> {
        let core = s.trim().split(['-', '+', ' ']).next().unwrap_or("");
        if core.is_empty() {
            return Err(ClientError::Config(format!("Invalid version: {:?}", s)));
        }

        let mut parts = [0u32; 3];
        for (i, piece) in core.split('.').enumerate() {
            if i >= parts.len() {
                break;
            }
            parts[i] = piece
                .parse()
                .map_err(|_| ClientError::Config(format!("Invalid version: {:?}", s)))?;
        }

        Ok(Version::new(parts[0], parts[1], parts[2]))
    }
}
