//! Configuration management for the gridcast service.
//!
//! Handles loading configuration from an optional TOML file and
//! environment variables, and validates all settings before the server
//! starts.

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the gridcast service
#[derive(Debug, Clone, Deserialize)]
pub struct GridcastConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream weather API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind the listener to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind the listener to
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream weather API settings
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the points lookup API
    #[serde(default = "default_points_base_url")]
    pub points_base_url: String,
    /// User agent sent with every upstream request; the weather API
    /// rejects requests without one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Wall-clock budget for one inbound request, shared by both chained
    /// upstream calls
    #[serde(default = "default_request_budget_ms")]
    pub request_budget_ms: u64,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive (e.g. "info" or "gridcast=debug,warn")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_points_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_user_agent() -> String {
    format!("gridcast/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_budget_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            points_base_url: default_points_base_url(),
            user_agent: default_user_agent(),
            request_budget_ms: default_request_budget_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for GridcastConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GridcastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var("GRIDCAST_CONFIG").map(PathBuf::from).ok();
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("gridcast.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // Environment variable overrides with GRIDCAST_ prefix, e.g.
        // GRIDCAST_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("GRIDCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: GridcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            bail!("Server host cannot be empty");
        }

        if !self.upstream.points_base_url.starts_with("http://")
            && !self.upstream.points_base_url.starts_with("https://")
        {
            bail!("Points base URL must be a valid HTTP or HTTPS URL");
        }

        if self.upstream.request_budget_ms == 0 {
            bail!("Request budget must be greater than zero");
        }

        if self.upstream.request_budget_ms > 60_000 {
            bail!("Request budget cannot exceed 60000 ms");
        }

        if self.upstream.user_agent.is_empty() {
            bail!("Upstream user agent cannot be empty");
        }

        Ok(())
    }

    /// Address the listener binds to, `host:port`
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Per-request wall-clock budget covering both upstream calls
    #[must_use]
    pub fn request_budget(&self) -> Duration {
        Duration::from_millis(self.upstream.request_budget_ms)
    }
}
