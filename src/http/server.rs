//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, security headers)
//! - Bind server to listener
//! - Hand `/proxy/{endpoint}` calls to the relay core

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderMap, HeaderValue},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::docs::{self, SchemaCache};
use crate::http::health;
use crate::http::request::{self, RequestIdExt};
use crate::relay::{ForwardError, Forwarder, RelayResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub schema: Arc<SchemaCache>,
    pub max_body_size: usize,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Arc<RelayConfig>, forwarder: Forwarder) -> Self {
        let state = AppState {
            forwarder: Arc::new(forwarder),
            schema: Arc::new(SchemaCache::new(&config.service)),
            max_body_size: config.security.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(docs::root))
            .route("/health", get(health::health_check))
            .route("/openapi.json", get(docs::openapi_json))
            .route("/openapi.txt", get(docs::openapi_txt))
            .route("/proxy/", post(proxy_root_handler))
            .route("/proxy/{*endpoint}", post(proxy_handler))
            .with_state(state);

        if config.security.enable_headers {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ));
        }

        if config.security.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router.layer(
            ServiceBuilder::new()
                .layer(request::set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request::make_span::<Body>))
                .layer(request::propagate_request_id_layer()),
        )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `POST /proxy/{*endpoint}`
///
/// Reads the path and body itself so that an undecodable endpoint or an
/// unreadable or oversized body comes back as a relay error object instead
/// of a bare rejection.
async fn proxy_handler(
    State(state): State<AppState>,
    endpoint: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Body,
) -> RelayResult {
    match endpoint {
        Ok(Path(endpoint)) => relay(state, endpoint, headers, body).await,
        Err(rejection) => state.forwarder.fail(
            "<undecodable>",
            ForwardError::InvalidRequest(rejection.body_text()),
            Instant::now(),
        ),
    }
}

/// `POST /proxy/`: the empty endpoint, forwarded to `{base_url}/`.
async fn proxy_root_handler(State(state): State<AppState>, headers: HeaderMap, body: Body) -> RelayResult {
    relay(state, String::new(), headers, body).await
}

async fn relay(state: AppState, endpoint: String, headers: HeaderMap, body: Body) -> RelayResult {
    let start = Instant::now();

    tracing::debug!(
        request_id = %headers.request_id(),
        endpoint = %endpoint,
        "Proxying request"
    );

    match to_bytes(body, state.max_body_size).await {
        Ok(raw_body) => state.forwarder.forward(&endpoint, raw_body).await,
        Err(e) => state
            .forwarder
            .fail(&endpoint, ForwardError::BodyRead(e.to_string()), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn server(config: RelayConfig) -> HttpServer {
        let forwarder = Forwarder::new(&config.upstream).unwrap();
        HttpServer::new(Arc::new(config), forwarder)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_html() {
        let app = server(RelayConfig::default()).router();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_request_id_is_assigned_and_echoed() {
        let app = server(RelayConfig::default()).router();

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(request::X_REQUEST_ID));

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(request::X_REQUEST_ID, "caller-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[request::X_REQUEST_ID], "caller-42");
    }

    #[tokio::test]
    async fn test_security_header_toggle() {
        let response = server(RelayConfig::default())
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

        let mut config = RelayConfig::default();
        config.security.enable_headers = false;
        let response = server(config)
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(!response.headers().contains_key(header::X_CONTENT_TYPE_OPTIONS));
    }

    #[tokio::test]
    async fn test_openapi_json_negotiates_text() {
        let app = server(RelayConfig::default()).router();

        let response = app
            .clone()
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let doc = body_json(response).await;
        assert_eq!(doc["openapi"], "3.1.0");

        let response = app
            .oneshot(
                Request::get("/openapi.json")
                    .header(header::ACCEPT, "text/plain")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            crate::http::response::TEXT_PLAIN_UTF8
        );
        let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(text.starts_with(b"{\n  \""));
    }

    #[tokio::test]
    async fn test_openapi_txt_matches_text_rendering() {
        let app = server(RelayConfig::default()).router();
        let txt = app
            .clone()
            .oneshot(Request::get("/openapi.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let txt = to_bytes(txt.into_body(), usize::MAX).await.unwrap();

        let negotiated = app
            .oneshot(
                Request::get("/openapi.json")
                    .header(header::ACCEPT, "text/html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let negotiated = to_bytes(negotiated.into_body(), usize::MAX).await.unwrap();
        assert_eq!(txt, negotiated);
    }

    #[tokio::test]
    async fn test_oversized_body_becomes_relay_error() {
        let mut config = RelayConfig::default();
        config.security.max_body_size = 8;
        let app = server(config).router();

        let response = app
            .oneshot(
                Request::post("/proxy/query")
                    .body(Body::from("this body is longer than eight bytes"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["status"], 500);
        assert!(value["error"].as_str().unwrap().starts_with("failed to read request body"));
    }

    #[tokio::test]
    async fn test_undecodable_endpoint_becomes_relay_error() {
        let app = server(RelayConfig::default()).router();
        let response = app
            .oneshot(Request::post("/proxy/%FF").body(Body::from("{}")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let value = body_json(response).await;
        assert_eq!(value["status"], 500);
        assert!(!value["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_on_proxy_is_not_routed() {
        let app = server(RelayConfig::default()).router();
        let response = app
            .oneshot(Request::get("/proxy/query").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
