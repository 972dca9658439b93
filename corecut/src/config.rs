//! Configuration loading for corecut.
//!
//! Supports loading configuration from TOML files, with the dashboard's
//! default cost parameters for anything left unset.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use anyhow::{Context, Result};
use corecut_core::CostParameters;
use serde::{Deserialize, Serialize};

/// Top-level configuration for corecut.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parameters that convert execution time into money and energy.
    pub cost: CostConfig,
    /// Settings for the dashboard server.
    pub server: ServerConfig,
    /// Settings for terminal output.
    pub output: OutputConfig,
}

/// Cost parameters as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Cost of one hour of execution time (currency/hour).
    pub hourly_rate: f64,
    /// Price of electricity (currency/kWh).
    pub electricity_price: f64,
    /// Power draw of the server while executing (watts).
    pub server_watts: f64,
    /// Number of executions per working day.
    pub executions_per_day: f64,
    /// Number of working days per year.
    pub working_days_per_year: f64,
}

/// Configuration for the dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

/// Configuration for terminal output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to colorize terminal output.
    pub color: bool,
    /// Currency symbol shown next to money amounts.
    pub currency: String,
}

impl Default for CostConfig {
    fn default() -> Self {
        CostParameters::default().into()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            currency: "€".to_string(),
        }
    }
}

impl From<CostParameters> for CostConfig {
    fn from(params: CostParameters) -> Self {
        Self {
            hourly_rate: params.hourly_rate,
            electricity_price: params.electricity_price,
            server_watts: params.server_watts,
            executions_per_day: params.executions_per_day,
            working_days_per_year: params.working_days_per_year,
        }
    }
}

impl From<&CostConfig> for CostParameters {
    fn from(cost: &CostConfig) -> Self {
        Self {
            hourly_rate: cost.hourly_rate,
            electricity_price: cost.electricity_price,
            server_watts: cost.server_watts,
            executions_per_day: cost.executions_per_day,
            working_days_per_year: cost.working_days_per_year,
        }
    }
}

impl ServerConfig {
    /// Socket address for `bind` and `port`. `bind` may be an IP address or
    /// a host name; the first resolved address is used.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.bind.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid server address: {}:{}", self.bind, self.port))?
            .next()
            .with_context(|| format!("No address found for {}", self.bind))
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".corecut.toml";

impl Config {
    /// Cost parameters to feed the savings estimator.
    pub fn cost_parameters(&self) -> CostParameters {
        CostParameters::from(&self.cost)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `.corecut.toml` in the current directory, or
    /// use defaults if that file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or fall back to
    /// [`Config::load_or_default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the specified file cannot be read or parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }
}
