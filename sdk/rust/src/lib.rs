//! Client SDK for the MCP relay.

mod client;

pub use client::{FunctionCall, FunctionCallEnvelope, RelayClient, SdkError};
