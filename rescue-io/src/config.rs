//! Configuration for the sensor relay
//!
//! Loads relay endpoints and cadence from a TOML file. Every field has a
//! default so a partial file (or none at all) is valid.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Relay link configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Address the primary robot listens on for relay frames
    ///
    /// Examples:
    /// - `0.0.0.0:5600` - All interfaces
    /// - `127.0.0.1:5600` - Localhost only
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Address the relay robot sends frames to
    #[serde(default = "default_peer_address")]
    pub peer_address: String,

    /// Publish period per channel in milliseconds (default: 150)
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

fn default_bind_address() -> String {
    "0.0.0.0:5600".to_string()
}

fn default_peer_address() -> String {
    "192.168.0.10:5600".to_string()
}

fn default_period_ms() -> u64 {
    150
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            peer_address: default_peer_address(),
            period_ms: default_period_ms(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use rescue_io::config::RelayConfig;
    ///
    /// let config = RelayConfig::from_file("relay.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: RelayConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Publish period as a [`Duration`]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Parsed peer address
    pub fn peer(&self) -> Result<SocketAddr> {
        self.peer_address.parse().map_err(|e| {
            crate::Error::Config(format!("invalid peer_address {}: {}", self.peer_address, e))
        })
    }
}
