// ABOUTME: Environment-based server configuration for port, network mode and history size
// ABOUTME: Reports uninterpretable values as CONFIG_INVALID errors instead of defaulting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

use crate::constants::{env_config, network};
use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use tweakkit_core::HISTORY_CAPACITY;

/// Which interfaces the server listens on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Loopback only
    #[default]
    #[serde(rename = "localhost")]
    LocalhostOnly,
    /// Every interface, reachable from the local network
    Lan,
}

impl NetworkMode {
    /// Address the listener binds to
    #[must_use]
    pub const fn bind_address(self) -> IpAddr {
        match self {
            Self::LocalhostOnly => network::LOCALHOST,
            Self::Lan => network::ALL_INTERFACES,
        }
    }

    /// Configuration name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalhostOnly => "localhost",
            Self::Lan => "lan",
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkMode {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "localhost" | "local" | "loopback" => Ok(Self::LocalhostOnly),
            "lan" => Ok(Self::Lan),
            other => Err(AppError::config_invalid(format!(
                "{}: expected 'localhost' or 'lan', got '{other}'",
                env_config::NETWORK_MODE
            ))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening port; `0` picks a free port
    pub port: u16,
    /// Bind scope
    pub network_mode: NetworkMode,
    /// Number of change events retained by the registry
    pub history_capacity: usize,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: network::DEFAULT_PORT,
            network_mode: NetworkMode::default(),
            history_capacity: HISTORY_CAPACITY,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` when a variable is set but cannot be interpreted
    pub fn from_env() -> AppResult<Self> {
        let network_mode = match env::var(env_config::NETWORK_MODE) {
            Ok(value) => value.parse()?,
            Err(_) => NetworkMode::default(),
        };

        let history_capacity =
            parse_env_or::<usize>(env_config::HISTORY_CAPACITY, HISTORY_CAPACITY)?;
        if history_capacity == 0 {
            return Err(AppError::config_invalid(format!(
                "{} must be at least 1",
                env_config::HISTORY_CAPACITY
            )));
        }

        Ok(Self {
            port: parse_env_or(env_config::PORT, network::DEFAULT_PORT)?,
            network_mode,
            history_capacity,
            logging: LoggingConfig::from_env(),
        })
    }

    /// Address to bind the listener to
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.network_mode.bind_address(), self.port)
    }

    /// Multi-line description for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "TweakKit Server Configuration:\n\
             - Port: {}\n\
             - Network Mode: {} ({})\n\
             - History Capacity: {}\n\
             - Log Level: {}\n\
             - Log Format: {:?}",
            self.port,
            self.network_mode,
            self.network_mode.bind_address(),
            self.history_capacity,
            self.logging.level,
            self.logging.format,
        )
    }
}

/// Parse `key` as `T`, using `default` when it is unset
fn parse_env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            AppError::config_invalid(format!("{key}: cannot parse '{raw}': {e}"))
        }),
        Err(_) => Ok(default),
    }
}
