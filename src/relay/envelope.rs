//! Inbound body interpretation.
//!
//! # Responsibilities
//! - Recognize the `{"function_call": {"name", "parameters"}}` envelope
//! - Unwrap it into the serialized `parameters` value
//! - Pass every other body through byte-for-byte
//!
//! # Design Decisions
//! - Only a top-level JSON object with a `function_call` key is an envelope;
//!   arrays, scalars, invalid JSON and non-UTF-8 bytes are all verbatim
//! - A `name` that disagrees with the URL endpoint is logged, never enforced
//! - `parameters` defaults to `{}` only when the key is absent; an explicit
//!   `null` is forwarded as `null`

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::relay::error::ForwardError;

/// Key that marks a body as a function-call envelope.
pub const FUNCTION_CALL_KEY: &str = "function_call";

/// Where the forwarded bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// Serialized `function_call.parameters`.
    EnvelopeParameters,
    /// Inbound body, unchanged.
    Verbatim,
}

impl PayloadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadSource::EnvelopeParameters => "envelope_parameters",
            PayloadSource::Verbatim => "verbatim",
        }
    }
}

/// The exact bytes sent upstream. Built once per request, never modified.
#[derive(Debug, Clone)]
pub struct ForwardPayload {
    bytes: Bytes,
    source: PayloadSource,
}

impl ForwardPayload {
    fn verbatim(raw_body: &Bytes) -> Self {
        Self {
            bytes: raw_body.clone(),
            source: PayloadSource::Verbatim,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn source(&self) -> PayloadSource {
        self.source
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Decide what to forward for `raw_body` arriving on `endpoint`.
///
/// Fails only when the body is a JSON object whose `function_call` member is
/// not itself an object.
pub fn transform(endpoint: &str, raw_body: &Bytes) -> Result<ForwardPayload, ForwardError> {
    let parsed = match serde_json::from_slice::<Value>(raw_body) {
        Ok(value) => value,
        Err(_) => {
            tracing::debug!(endpoint = %endpoint, "Body is not JSON, forwarding as-is");
            return Ok(ForwardPayload::verbatim(raw_body));
        }
    };

    let call = match parsed.as_object().and_then(|obj| obj.get(FUNCTION_CALL_KEY)) {
        Some(call) => call,
        None => {
            tracing::debug!(endpoint = %endpoint, "No function_call found, forwarding as-is");
            return Ok(ForwardPayload::verbatim(raw_body));
        }
    };

    let call = call.as_object().ok_or_else(|| {
        ForwardError::MalformedEnvelope(format!("expected an object, found {}", json_type(call)))
    })?;

    if let Some(name) = mismatched_name(call, endpoint) {
        tracing::warn!(
            endpoint = %endpoint,
            function_name = %name,
            "Function name does not match endpoint, forwarding anyway"
        );
    }

    let parameters = call
        .get("parameters")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let bytes = serde_json::to_vec(&parameters)
        .map_err(|e| ForwardError::MalformedEnvelope(e.to_string()))?;

    Ok(ForwardPayload {
        bytes: Bytes::from(bytes),
        source: PayloadSource::EnvelopeParameters,
    })
}

/// Returns the declared name when it is set and differs from `endpoint`.
fn mismatched_name(call: &Map<String, Value>, endpoint: &str) -> Option<String> {
    match call.get("name")? {
        Value::Null => None,
        Value::String(name) if name.is_empty() || name == endpoint => None,
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
