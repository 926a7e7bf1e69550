//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Derive the filter from `RUST_LOG` or the configured log level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` always wins over the configured level
//! - The configured level applies to this crate and to `tower_http` spans

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing_subscriber::util::TryInitError;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(log_level: &str) -> EnvFilter {
    let level = log_level.to_lowercase();
    EnvFilter::new(format!("mcp_relay={level},tower_http={level}"))
}

/// Install the global subscriber.
pub fn init(log_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_targets_crate() {
        let filter = default_filter("DEBUG").to_string();
        assert!(filter.contains("mcp_relay=debug"));
        assert!(filter.contains("tower_http=debug"));
    }
}
