//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from the validated config
//! - Build the relay core
//! - Bind the listener and serve until a shutdown signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::relay::Forwarder;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] logging::TryInitError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build upstream client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring the relay up and serve until SIGINT/SIGTERM.
pub async fn run(config: RelayConfig) -> Result<(), StartupError> {
    // 1. Logging
    logging::init(&config.observability.log_level)?;
    tracing::info!("mcp-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if config.upstream.uses_default_password() {
        tracing::warn!(
            username = %config.upstream.username,
            "Upstream password is the built-in placeholder; set UPSTREAM_PASSWORD"
        );
    }

    tracing::info!(
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        allow_list = config.upstream.allowed_endpoints.is_some(),
        "Configuration loaded"
    );

    // 2. Metrics
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    // 3. Relay core
    let forwarder = Forwarder::new(&config.upstream)?;

    // 4. Listener
    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(address = %local_addr, "Listening for connections");
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on(signals::shutdown_signal());

    let server = HttpServer::new(Arc::new(config), forwarder);
    server
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
