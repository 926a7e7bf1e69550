//! Command-line and environment overrides for the relay binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, ConfigError, RelayConfig};

/// Authenticated relay for a single MCP upstream.
#[derive(Debug, Default, Parser)]
#[command(name = "mcp-relay", version, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "RELAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Upstream base URL; the endpoint is appended after a '/'
    #[arg(long, env = "UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Basic-auth username for the upstream
    #[arg(long, env = "UPSTREAM_USERNAME")]
    pub upstream_username: Option<String>,

    /// Basic-auth password for the upstream
    #[arg(long, env = "UPSTREAM_PASSWORD", hide_env_values = true)]
    pub upstream_password: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply every flag that was given on top of `config`.
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(url) = &self.upstream_url {
            config.upstream.base_url = url.clone();
        }
        if let Some(username) = &self.upstream_username {
            config.upstream.username = username.clone();
        }
        if let Some(password) = &self.upstream_password {
            config.upstream.password = password.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.to_lowercase();
        }
    }

    /// Defaults, then the config file (if any), then flags; validated.
    pub fn load_config(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::read_config(path)?,
            None => RelayConfig::default(),
        };
        self.apply(&mut config);
        config::finalize(config)
    }
}
