//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use mcp_relay::config::{finalize, RelayConfig};
use mcp_relay::lifecycle::Shutdown;
use mcp_relay::{Forwarder, HttpServer};
use tokio::net::TcpListener;

/// Credentials every test relay is configured with.
pub const USERNAME: &str = "relay";
pub const PASSWORD: &str = "s3cret";
/// `Basic base64("relay:s3cret")`
pub const EXPECTED_AUTHORIZATION: &str = "Basic cmVsYXk6czNjcmV0";

/// One request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub body: Vec<u8>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

pub type Captures = Arc<Mutex<Vec<CapturedRequest>>>;

#[derive(Clone)]
struct Recorder {
    captures: Captures,
    status: StatusCode,
    body: &'static str,
}

async fn record(State(recorder): State<Recorder>, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    recorder.captures.lock().unwrap().push(CapturedRequest {
        path: uri.path().to_string(),
        body: body.to_vec(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
    });
    (recorder.status, recorder.body)
}

/// Start an upstream that records every request and answers with a fixed
/// status and body.
pub async fn start_recording_upstream(status: u16, body: &'static str) -> (SocketAddr, Captures) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captures: Captures = Arc::default();

    let app = Router::new().fallback(record).with_state(Recorder {
        captures: captures.clone(),
        status: StatusCode::from_u16(status).unwrap(),
        body,
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, captures)
}

/// Start an upstream that accepts connections and never answers.
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => held.push(socket),
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address with nothing listening on it.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Relay config pointing at `upstream` with the test credentials.
pub fn relay_config(upstream: SocketAddr) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.base_url = format!("http://{}/mcp", upstream);
    config.upstream.username = USERNAME.to_string();
    config.upstream.password = PASSWORD.to_string();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config
}

/// A running relay on an ephemeral port.
pub struct TestRelay {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_relay(config: RelayConfig) -> TestRelay {
    let config = finalize(config).expect("test config must be valid");
    let forwarder = Forwarder::new(&config.upstream).unwrap();
    let server = HttpServer::new(Arc::new(config), forwarder);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestRelay { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
