use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body shape that the relay unwraps before forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallEnvelope {
    pub function_call: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub parameters: Value,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Thin client for a running relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self::with_client(Client::new(), relay_url)
    }

    pub fn with_client(client: Client, relay_url: &str) -> Self {
        Self {
            client,
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /health`; true when the relay reports `{"ok": true}`.
    pub async fn health(&self) -> Result<bool, SdkError> {
        let value = self.get_json("/health").await?;
        Ok(value.get("ok").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Call `name` with `parameters`, wrapped in a `function_call` envelope.
    ///
    /// Returns whatever the relay answered: the upstream's JSON, or one of
    /// the relay's wrapped result objects.
    pub async fn call_function(&self, name: &str, parameters: Value) -> Result<Value, SdkError> {
        let envelope = FunctionCallEnvelope {
            function_call: FunctionCall {
                name: name.to_string(),
                parameters,
            },
        };
        let resp = self
            .client
            .post(format!("{}/proxy/{}", self.relay_url, name))
            .json(&envelope)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// Send `body` to `endpoint` without any envelope.
    pub async fn forward_raw(&self, endpoint: &str, body: impl Into<reqwest::Body>) -> Result<Value, SdkError> {
        let resp = self
            .client
            .post(format!("{}/proxy/{}", self.relay_url, endpoint))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// `GET /openapi.json`
    pub async fn openapi(&self) -> Result<Value, SdkError> {
        self.get_json("/openapi.json").await
    }

    /// `GET /openapi.txt`
    pub async fn openapi_text(&self) -> Result<String, SdkError> {
        let resp = self
            .client
            .get(format!("{}/openapi.txt", self.relay_url))
            .header(ACCEPT, "text/plain")
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SdkError::Status { status, body: text });
        }
        Ok(text)
    }

    async fn get_json(&self, path: &str) -> Result<Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}{}", self.relay_url, path))
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, SdkError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SdkError::Status { status, body });
        }
        Ok(resp.json().await?)
    }
}
