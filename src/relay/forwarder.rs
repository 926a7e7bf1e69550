//! Authenticated forwarding to the upstream service.
//!
//! # Responsibilities
//! - Apply the endpoint policy
//! - Build the forward payload from the inbound body
//! - POST it to `{base_url}/{endpoint}` with Basic credentials
//! - Translate the upstream answer, or any failure, into a `RelayResult`
//!
//! # Design Decisions
//! - One outbound attempt per inbound call; nothing is retried or cached
//! - `Content-Type: application/json` is always sent, even for verbatim bodies
//! - Failures never escape `forward`; they are logged with their kind and
//!   collapsed into the `{"error", "status"}` shape

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::relay::envelope;
use crate::relay::error::ForwardError;
use crate::relay::outcome::RelayResult;
use crate::relay::policy::{self, EndpointPolicy};

/// Fixed Basic-auth pair applied to every outbound call.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stateless relay core shared by all request handlers.
#[derive(Debug)]
pub struct Forwarder {
    client: Client,
    base_url: String,
    credentials: Credentials,
    policy: Arc<dyn EndpointPolicy>,
}

impl Forwarder {
    /// Build a forwarder from the upstream section of the config.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credentials: Credentials::new(&config.username, &config.password),
            policy: policy::from_allowed(config.allowed_endpoints.as_deref()),
        })
    }

    /// Replace the endpoint policy.
    pub fn with_policy(mut self, policy: Arc<dyn EndpointPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Target URL for `endpoint`. The endpoint is appended as-is.
    pub fn upstream_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Run one relay call. Always produces a result.
    pub async fn forward(&self, endpoint: &str, raw_body: Bytes) -> RelayResult {
        let start = Instant::now();

        tracing::info!(endpoint = %endpoint, "Received relay request");
        tracing::debug!(
            endpoint = %endpoint,
            body = %String::from_utf8_lossy(&raw_body),
            "Request body"
        );

        match self.try_forward(endpoint, &raw_body).await {
            Ok(result) => {
                metrics::record_forward(result.outcome(), start);
                result
            }
            Err(err) => self.fail(endpoint, err, start),
        }
    }

    /// Log, count and collapse a failure that happened before or during
    /// the outbound call.
    pub fn fail(&self, endpoint: &str, err: ForwardError, start: Instant) -> RelayResult {
        tracing::error!(
            endpoint = %endpoint,
            error_kind = err.kind(),
            error = %err,
            "Relay failed"
        );
        metrics::record_forward(err.kind(), start);
        RelayResult::from_error(&err)
    }

    async fn try_forward(&self, endpoint: &str, raw_body: &Bytes) -> Result<RelayResult, ForwardError> {
        // 1. Policy
        self.policy.check(endpoint)?;

        // 2. Payload
        let payload = envelope::transform(endpoint, raw_body)?;
        tracing::debug!(
            endpoint = %endpoint,
            source = payload.source().as_str(),
            body = %String::from_utf8_lossy(payload.bytes()),
            "Forwarding to upstream"
        );

        // 3. Outbound call
        let response = self
            .client
            .post(self.upstream_url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .body(payload.into_bytes())
            .send()
            .await
            .map_err(ForwardError::from_send)?;

        // 4. Translate
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(ForwardError::from_body)?;
        let result = RelayResult::from_upstream(status, &body);

        match &result {
            RelayResult::Json(value) => {
                tracing::info!(endpoint = %endpoint, status, "Upstream answered with JSON");
                tracing::debug!(endpoint = %endpoint, response = %value, "Upstream response");
            }
            RelayResult::NonJson { response, .. } => {
                tracing::info!(endpoint = %endpoint, status, "Upstream answered with non-JSON body");
                tracing::debug!(endpoint = %endpoint, response = %response, "Upstream response");
            }
            RelayResult::Failed { .. } => {}
        }

        Ok(result)
    }
}
