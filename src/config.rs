//! Configuration for the Atlas client
//!
//! Centralized configuration with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::features::Version;

/// Main configuration for one client connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = none)
    ///
    /// A timeout fails the whole connection, so leave it at 0 for
    /// connections that may sit idle.
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Command Configuration
    // -------------------------------------------------------------------------
    /// Database index used by the CLI when none is given
    pub default_db: u32,

    /// Known server version; skips negotiation when set
    pub server_version: Option<Version>,

    /// Ask the server for its version (`INFO server`) on connect
    pub negotiate_version: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            default_db: 0,
            server_version: None,
            negotiate_version: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the default database index
    pub fn default_db(mut self, db: u32) -> Self {
        self.config.default_db = db;
        self
    }

    /// Pin the server version instead of negotiating it
    pub fn server_version(mut self, version: Version) -> Self {
        self.config.server_version = Some(version);
        self
    }

    /// Enable or disable `INFO`-based version negotiation
    pub fn negotiate_version(mut self, enabled: bool) -> Self {
        self.config.negotiate_version = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
