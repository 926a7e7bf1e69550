//! Local stand-in for the upstream MCP server.
//!
//! ```text
//! cargo run --example mock_upstream
//! UPSTREAM_URL=http://127.0.0.1:8000/mcp PORT=8080 cargo run
//! curl -X POST localhost:8080/proxy/query -d '{"function_call": {"name": "query", "parameters": {"sql": "SELECT 1"}}}'
//! ```

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;

async fn handle(Path(endpoint): Path<String>, headers: HeaderMap, body: Bytes) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Basic "))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing basic credentials").into_response();
    }

    match endpoint.as_str() {
        "ping" => "pong".into_response(),
        _ => {
            let params: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            Json(json!({ "endpoint": endpoint, "received": params, "rows": [] })).into_response()
        }
    }
}

#[tokio::main]
async fn main() {
    let app = Router::new().route("/mcp/{*endpoint}", post(handle));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("Mock upstream listening on http://{}/mcp", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
