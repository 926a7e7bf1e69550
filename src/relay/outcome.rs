//! Caller-facing result of a relay call.

use serde_json::{json, Value};

use crate::relay::error::ForwardError;

/// What the caller receives from `POST /proxy/{endpoint}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayResult {
    /// Upstream body parsed as JSON, returned unchanged.
    Json(Value),
    /// Upstream answered with something that is not JSON.
    NonJson { response: String, status: u16 },
    /// The call failed before a usable upstream answer was read.
    Failed { error: String, status: u16 },
}

impl RelayResult {
    /// Translate an upstream answer. The status only survives in the
    /// non-JSON shape.
    pub fn from_upstream(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => RelayResult::Json(value),
            Err(_) => RelayResult::NonJson {
                response: String::from_utf8_lossy(body).into_owned(),
                status,
            },
        }
    }

    pub fn from_error(err: &ForwardError) -> Self {
        RelayResult::Failed {
            error: err.to_string(),
            status: err.reported_status(),
        }
    }

    /// Label used for metrics on non-failure outcomes.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayResult::Json(_) => "upstream_json",
            RelayResult::NonJson { .. } => "upstream_text",
            RelayResult::Failed { .. } => "failed",
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            RelayResult::Json(value) => value,
            RelayResult::NonJson { response, status } => json!({
                "response": response,
                "status": status,
                "error": null,
            }),
            RelayResult::Failed { error, status } => json!({
                "error": error,
                "status": status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_passes_through() {
        let result = RelayResult::from_upstream(200, br#"{"rows": []}"#);
        assert_eq!(result.into_value(), json!({"rows": []}));
    }

    #[test]
    fn test_json_body_drops_upstream_status() {
        let result = RelayResult::from_upstream(404, br#"{"detail": "Not Found"}"#);
        assert_eq!(result.into_value(), json!({"detail": "Not Found"}));
    }

    #[test]
    fn test_non_json_body_is_wrapped() {
        let result = RelayResult::from_upstream(200, b"not json");
        assert_eq!(
            result.into_value(),
            json!({"response": "not json", "status": 200, "error": null})
        );
    }

    #[test]
    fn test_empty_body_keeps_real_status() {
        let result = RelayResult::from_upstream(502, b"");
        assert_eq!(
            result.into_value(),
            json!({"response": "", "status": 502, "error": null})
        );
    }

    #[test]
    fn test_failure_shape() {
        let err = ForwardError::Connect("connection refused".into());
        let value = RelayResult::from_error(&err).into_value();
        assert_eq!(value, json!({"error": "connection refused", "status": 500}));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_wrapped_key_order() {
        let text = serde_json::to_string(&RelayResult::from_upstream(200, b"ok").into_value()).unwrap();
        assert_eq!(text, r#"{"response":"ok","status":200,"error":null}"#);
    }
}
