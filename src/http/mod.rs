//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → POST /proxy/{*endpoint} → relay core
//!       GET /, /openapi.* → docs.rs
//!       GET /health → health.rs
//!     → response.rs (relay results always answered as HTTP 200 JSON)
//!     → Send to client
//! ```

pub mod docs;
pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
