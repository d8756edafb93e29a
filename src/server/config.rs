//! Server configuration loaded via OrthoConfig.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_LOCK_TTL_MINUTES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Configuration values for the HTTP server and the background sweeper.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RISERVA")]
pub struct ServerSettings {
    /// Socket address to bind the listener to.
    pub bind_addr: Option<SocketAddr>,
    /// Reservation lock TTL override, in minutes.
    pub lock_ttl_minutes: Option<i64>,
    /// Interval between global expiry sweeps, in seconds.
    #[ortho_config(default = DEFAULT_SWEEP_INTERVAL_SECONDS)]
    pub sweep_interval_seconds: Option<u64>,
}

impl ServerSettings {
    /// The bind address, falling back to the default listener.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        match self.bind_addr {
            Some(addr) => Ok(addr),
            None => DEFAULT_BIND_ADDR.parse(),
        }
    }

    /// The lock TTL, falling back to the domain default.
    #[must_use]
    pub fn lock_ttl(&self) -> TimeDelta {
        TimeDelta::minutes(self.lock_ttl_minutes.unwrap_or(DEFAULT_LOCK_TTL_MINUTES))
    }

    /// The sweep interval, falling back to the default cadence.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(
            self.sweep_interval_seconds
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECONDS),
        )
    }
}
