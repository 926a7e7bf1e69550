//! Liveness endpoint.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::docs::accepts;

/// Media type answered to `application/health` probes.
pub const HEALTH_JSON: &str = "application/health+json";

/// `GET /health`
///
/// Probes asking for `application/health` get an empty 204; everyone else
/// gets `{"ok": true}`.
pub async fn health_check(headers: HeaderMap) -> Response {
    if accepts(&headers, "application/health") {
        (StatusCode::NO_CONTENT, [(header::CONTENT_TYPE, HEALTH_JSON)]).into_response()
    } else {
        Json(json!({ "ok": true })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_health_probe_gets_no_content() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/health+json"));

        let response = health_check(headers).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], HEALTH_JSON);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_default_health_body() {
        let response = health_check(HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"ok":true}"#);
    }
}
