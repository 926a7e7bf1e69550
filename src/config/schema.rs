//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Password shipped as the built-in default. Startup warns while it is in use.
pub const DEFAULT_PASSWORD: &str = "CHANGE_ME_IN_PRODUCTION";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// The single upstream service and its credentials.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Inbound hardening.
    pub security: SecurityConfig,

    /// Metadata published in the API schema.
    pub service: ServiceConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

/// Upstream configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL; the endpoint is appended after a `/`.
    pub base_url: String,

    /// Basic-auth username.
    pub username: String,

    /// Basic-auth password.
    pub password: String,

    /// Total time allowed for one outbound call, in seconds.
    pub timeout_secs: u64,

    /// When set, only these endpoints are forwarded.
    pub allowed_endpoints: Option<Vec<String>>,
}

impl UpstreamConfig {
    /// True while the password is still the shipped placeholder.
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_PASSWORD
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/mcp".to_string(),
            username: "relay".to_string(),
            // WARNING: This is a placeholder! Change this in production.
            password: DEFAULT_PASSWORD.to_string(),
            timeout_secs: 30,
            allowed_endpoints: None,
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("allowed_endpoints", &self.allowed_endpoints)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
    /// Answer CORS preflights for any origin.
    pub cors_enabled: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
            cors_enabled: true,
        }
    }
}

/// Service metadata for the generated API schema.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub title: String,
    pub description: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            title: "MCP Relay".to_string(),
            description: "Authenticated relay in front of a single MCP upstream".to_string(),
        }
    }
}
