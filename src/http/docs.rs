//! Documentation surface: root page and API schema.
//!
//! # Responsibilities
//! - Serve a static HTML landing page at `/`
//! - Describe the relay's routes as an OpenAPI document
//! - Serve that document as JSON or as indented text
//!
//! # Design Decisions
//! - The schema is built from config at startup and never changes, so both
//!   renderings are computed on first use and cached for the process lifetime
//! - `/openapi.json` switches to text when `Accept` mentions `text/`

use std::sync::OnceLock;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use serde_json::{json, Value};

use crate::config::ServiceConfig;
use crate::http::response;
use crate::http::server::AppState;

/// Static landing page.
pub const ROOT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>MCP Relay API</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; line-height: 1.6; }
        h1 { color: #333; }
        h2 { color: #444; margin-top: 30px; }
        pre { background-color: #f4f4f4; padding: 10px; border-radius: 5px; overflow-x: auto; }
        a { color: #0066cc; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .endpoint { margin-bottom: 20px; }
    </style>
</head>
<body>
    <h1>MCP Relay API</h1>
    <p>Forwards calls to the upstream MCP server and adds its credentials, so callers never send auth headers.</p>

    <h2>API Documentation</h2>
    <ul>
        <li><a href="/openapi.json">OpenAPI Specification (JSON)</a></li>
        <li><a href="/openapi.txt">OpenAPI Specification (Text)</a></li>
    </ul>

    <h2>Health Check</h2>
    <div class="endpoint">
        <pre>curl -X GET http://localhost/health</pre>
    </div>

    <h2>Example Calls</h2>
    <div class="endpoint">
        <h3>Execute SQL Query</h3>
        <pre>curl -X POST http://localhost/proxy/query \
    -H "Content-Type: application/json" \
    -d '{"function_call": {"name": "query", "parameters": {"sql": "SELECT * FROM users LIMIT 10"}}}'</pre>
    </div>

    <div class="endpoint">
        <h3>List Tables</h3>
        <pre>curl -X POST http://localhost/proxy/list_tables \
    -H "Content-Type: application/json" \
    -d '{"function_call": {"name": "list_tables", "parameters": {}}}'</pre>
    </div>
</body>
</html>
"#;

/// Build the OpenAPI document describing every route the relay serves.
pub fn openapi_document(service: &ServiceConfig) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": service.title,
            "description": service.description,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/proxy/{endpoint}": {
                "post": {
                    "summary": "Proxy",
                    "description": "Forward the body to the upstream at the same endpoint, adding credentials. A function_call envelope is unwrapped to its parameters; any other body is forwarded unchanged.",
                    "operationId": "proxy",
                    "parameters": [{
                        "name": "endpoint",
                        "in": "path",
                        "required": true,
                        "description": "Upstream endpoint; may contain '/'",
                        "schema": { "type": "string", "title": "Endpoint" }
                    }],
                    "requestBody": {
                        "required": false,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "oneOf": [
                                        { "$ref": "#/components/schemas/FunctionCallEnvelope" },
                                        {}
                                    ]
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Upstream JSON passed through, or a wrapped result",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "oneOf": [
                                            {},
                                            { "$ref": "#/components/schemas/NonJsonResponse" },
                                            { "$ref": "#/components/schemas/RelayError" }
                                        ]
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/": {
                "get": {
                    "summary": "Root",
                    "description": "HTML documentation page",
                    "operationId": "root",
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": { "text/html": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health Check",
                    "description": "Returns {\"ok\": true}, or 204 when Accept contains application/health",
                    "operationId": "health_check",
                    "responses": {
                        "200": {
                            "description": "Healthy",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "ok": { "type": "boolean" } }
                                    }
                                }
                            }
                        },
                        "204": { "description": "Healthy (application/health+json)" }
                    }
                }
            },
            "/openapi.json": {
                "get": {
                    "summary": "Get Openapi Schema",
                    "description": "This document; indented text when Accept contains text/",
                    "operationId": "get_openapi_schema",
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": {
                                "application/json": { "schema": { "type": "object" } },
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            },
            "/openapi.txt": {
                "get": {
                    "summary": "Openapi Txt",
                    "description": "This document as indented plain text for LLM tooling",
                    "operationId": "openapi_txt",
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "FunctionCallEnvelope": {
                    "type": "object",
                    "properties": {
                        "function_call": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "parameters": {}
                            }
                        }
                    },
                    "required": ["function_call"]
                },
                "NonJsonResponse": {
                    "type": "object",
                    "properties": {
                        "response": { "type": "string" },
                        "status": { "type": "integer" },
                        "error": { "type": "null" }
                    },
                    "required": ["response", "status", "error"]
                },
                "RelayError": {
                    "type": "object",
                    "properties": {
                        "error": { "type": "string" },
                        "status": { "type": "integer" }
                    },
                    "required": ["error", "status"]
                }
            }
        }
    })
}

/// OpenAPI document plus its lazily rendered forms.
#[derive(Debug)]
pub struct SchemaCache {
    document: Value,
    json: OnceLock<String>,
    text: OnceLock<String>,
}

impl SchemaCache {
    pub fn new(service: &ServiceConfig) -> Self {
        Self {
            document: openapi_document(service),
            json: OnceLock::new(),
            text: OnceLock::new(),
        }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Compact JSON rendering.
    pub fn json(&self) -> &str {
        self.json.get_or_init(|| self.document.to_string())
    }

    /// Two-space indented rendering.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| {
            serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| self.document.to_string())
        })
    }
}

/// True when any `Accept` header value contains `needle`.
pub fn accepts(headers: &HeaderMap, needle: &str) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(needle))
}

/// `GET /`
pub async fn root() -> Html<&'static str> {
    Html(ROOT_PAGE)
}

/// `GET /openapi.json`
pub async fn openapi_json(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if accepts(&headers, "text/") {
        response::text(state.schema.text().to_string())
    } else {
        response::raw_json(state.schema.json().to_string())
    }
}

/// `GET /openapi.txt`
pub async fn openapi_txt(State(state): State<AppState>) -> impl IntoResponse {
    response::text(state.schema.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_document_lists_every_route() {
        let doc = openapi_document(&ServiceConfig::default());
        let paths = doc["paths"].as_object().unwrap();
        for route in ["/proxy/{endpoint}", "/", "/health", "/openapi.json", "/openapi.txt"] {
            assert!(paths.contains_key(route), "missing {}", route);
        }
        assert_eq!(doc["info"]["title"], "MCP Relay");
    }

    #[test]
    fn test_title_comes_from_config() {
        let service = ServiceConfig {
            title: "Supabase Relay".into(),
            description: "relay".into(),
        };
        assert_eq!(openapi_document(&service)["info"]["title"], "Supabase Relay");
    }

    #[test]
    fn test_text_is_indented_and_stable() {
        let cache = SchemaCache::new(&ServiceConfig::default());
        let first = cache.text();
        assert!(first.starts_with("{\n  \"openapi\""));
        assert!(std::ptr::eq(first, cache.text()));

        let parsed: Value = serde_json::from_str(cache.json()).unwrap();
        assert_eq!(&parsed, cache.document());
    }

    #[test]
    fn test_accepts() {
        let mut headers = HeaderMap::new();
        assert!(!accepts(&headers, "text/"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain, */*"));
        assert!(accepts(&headers, "text/"));
        assert!(!accepts(&headers, "application/health"));
    }
}
