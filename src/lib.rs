//! Authenticated MCP relay library.
//!
//! Callers that cannot send credentials POST to `/proxy/{endpoint}`; the
//! relay unwraps an optional `function_call` envelope, adds the upstream's
//! Basic credentials and forwards the call to `{upstream}/{endpoint}`.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{Forwarder, RelayResult};
