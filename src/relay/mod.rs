//! Relay core.
//!
//! # Data Flow
//! ```text
//! POST /proxy/{endpoint} (raw body)
//!     → policy.rs (may this endpoint be forwarded?)
//!     → envelope.rs (unwrap function_call or pass through verbatim)
//!     → forwarder.rs (POST {base_url}/{endpoint} + Basic auth, 30s timeout)
//!     → outcome.rs (JSON passthrough | {response,status,error} | {error,status})
//! ```
//!
//! # Design Decisions
//! - No state survives a request; the forwarder only holds read-only config
//! - Every failure is converted to a result value at this boundary
//! - Failure kinds stay distinct in logs and metrics (error.rs) even though
//!   callers always see status 500

pub mod envelope;
pub mod error;
pub mod forwarder;
pub mod outcome;
pub mod policy;

pub use envelope::{transform, ForwardPayload, PayloadSource};
pub use error::ForwardError;
pub use forwarder::{Credentials, Forwarder};
pub use outcome::RelayResult;
pub use policy::{AllowAll, AllowList, EndpointPolicy};
