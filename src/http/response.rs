//! Response shaping.
//!
//! # Responsibilities
//! - Turn a `RelayResult` into an HTTP response
//! - Plain-text and JSON helpers for the schema endpoints
//!
//! # Design Decisions
//! - Relay responses are always HTTP 200; the outcome lives in the body,
//!   including the `status` field of the error shapes
//! - Pre-serialized bodies are sent as-is to avoid re-encoding cached values

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::relay::RelayResult;

/// Media type for the plain-text schema.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

impl IntoResponse for RelayResult {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.into_value())).into_response()
    }
}

/// `200 text/plain` with an already-rendered body.
pub fn text(body: String) -> Response {
    ([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body).into_response()
}

/// `200 application/json` with an already-serialized body.
pub fn raw_json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
