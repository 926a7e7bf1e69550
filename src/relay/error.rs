//! Forwarding failure classification.
//!
//! Callers only ever see the collapsed `{"error", "status"}` shape, but the
//! variants here keep timeout, connect and parse failures apart so logs and
//! metrics can tell them apart.

use thiserror::Error;

/// Everything that can go wrong between receiving a relay call and reading
/// the upstream response.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The upstream did not answer within the configured timeout.
    #[error("{0}")]
    Timeout(String),

    /// The upstream could not be reached (refused, DNS, TLS handshake).
    #[error("{0}")]
    Connect(String),

    /// The request could not be built (undecodable endpoint, bad URL, bad header value).
    #[error("{0}")]
    InvalidRequest(String),

    /// Any other transport-level failure reported by the HTTP client.
    #[error("{0}")]
    Transport(String),

    /// The inbound body could not be read (disconnect or size limit).
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The upstream answered but its body could not be read.
    #[error("failed to read upstream response: {0}")]
    UpstreamBody(String),

    /// `function_call` was present but was not an object.
    #[error("malformed function_call envelope: {0}")]
    MalformedEnvelope(String),

    /// The endpoint policy refused to forward this endpoint.
    #[error("endpoint '{0}' is not permitted by this relay")]
    EndpointRejected(String),
}

impl ForwardError {
    /// Classify a reqwest failure from `send()`.
    pub fn from_send(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            ForwardError::Timeout(message)
        } else if err.is_connect() {
            ForwardError::Connect(message)
        } else if err.is_builder() {
            ForwardError::InvalidRequest(message)
        } else {
            ForwardError::Transport(message)
        }
    }

    /// Classify a reqwest failure while draining the upstream body.
    pub fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout(err.to_string())
        } else {
            ForwardError::UpstreamBody(err.to_string())
        }
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::Timeout(_) => "timeout",
            ForwardError::Connect(_) => "connect",
            ForwardError::InvalidRequest(_) => "invalid_request",
            ForwardError::Transport(_) => "transport",
            ForwardError::BodyRead(_) => "body_read",
            ForwardError::UpstreamBody(_) => "upstream_body",
            ForwardError::MalformedEnvelope(_) => "malformed_envelope",
            ForwardError::EndpointRejected(_) => "endpoint_rejected",
        }
    }

    /// Value reported in the `status` field of the collapsed error body.
    ///
    /// Every failure reports 500 except a policy rejection, which only
    /// happens when an allow-list is configured.
    pub fn reported_status(&self) -> u16 {
        match self {
            ForwardError::EndpointRejected(_) => 403,
            _ => 500,
        }
    }
}
