use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND_ADDR: [u8; 4] = [0, 0, 0, 0];
const DEFAULT_API_PORT: u16 = 8081;
const DEFAULT_SOCKET_PORT: u16 = 8082;
const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, read from `RELAY_*` environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub bind_addr: IpAddr,
    /// Port of the HTTP Event Intake API
    pub api_port: u16,
    /// Port of the real-time socket listener
    pub socket_port: u16,
    pub delivery_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from(DEFAULT_BIND_ADDR),
            api_port: DEFAULT_API_PORT,
            socket_port: DEFAULT_SOCKET_PORT,
            delivery_timeout: Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parse_or(&lookup, "RELAY_BIND_ADDR", IpAddr::from(DEFAULT_BIND_ADDR))?,
            api_port: parse_or(&lookup, "RELAY_API_PORT", DEFAULT_API_PORT)?,
            socket_port: parse_or(&lookup, "RELAY_SOCKET_PORT", DEFAULT_SOCKET_PORT)?,
            delivery_timeout: Duration::from_millis(parse_or(
                &lookup,
                "RELAY_DELIVERY_TIMEOUT_MS",
                DEFAULT_DELIVERY_TIMEOUT_MS,
            )?),
        })
    }

    pub fn api_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.api_port)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.socket_port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
