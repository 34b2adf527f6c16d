//! Shared utilities for integration testing.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{header::LOCATION, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use cert_header_proxy::{HttpServer, ProxyConfig, Shutdown};

/// Start a mock origin on an ephemeral port.
///
/// - `/redirect` answers 302 to `/landing`
/// - `/teapot` answers 418 with an `x-origin` header
/// - anything else echoes method, path, headers and body as JSON
pub async fn start_echo_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route(
            "/redirect",
            any(|| async { (StatusCode::FOUND, [(LOCATION, "/landing")]) }),
        )
        .route(
            "/teapot",
            any(|| async {
                (
                    StatusCode::IM_A_TEAPOT,
                    [("x-origin", "teapot")],
                    "short and stout",
                )
            }),
        )
        .fallback(echo);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let mut seen = Map::new();
    for (name, value) in &headers {
        let entry = seen
            .entry(name.as_str().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = entry {
            values.push(Value::String(
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            ));
        }
    }

    Json(json!({
        "method": method.as_str(),
        "path": uri.to_string(),
        "headers": seen,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Start an origin answering every request with a 302 to `target`.
#[allow(dead_code)]
pub async fn start_redirecting_origin(target: SocketAddr) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let location = format!("http://{}/landing", target);

    let app = Router::new().fallback(any(move || {
        let location = location.clone();
        async move { (StatusCode::FOUND, [(LOCATION, location)]) }
    }));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// Start an origin that accepts one connection, reads from it and never
/// answers.
///
/// The first receiver fires once request bytes arrive, the second once the
/// peer closes the connection.
#[allow(dead_code)]
pub async fn start_stalling_origin() -> (SocketAddr, oneshot::Receiver<()>, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (received_tx, received_rx) = oneshot::channel();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Some(received_tx);
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if let Some(tx) = received.take() {
                        let _ = tx.send(());
                    }
                }
            }
        }
        let _ = closed_tx.send(());
    });

    (addr, received_rx, closed_rx)
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Config forwarding every request to `origin` over plain HTTP.
pub fn proxy_config(origin: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.origin.scheme = "http".into();
    config.origin.address = Some(origin.to_string());
    config
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that neither follows redirects nor uses a proxy, so every
/// redirect observed was followed by the proxy itself.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Client sending absolute-form requests through `proxy`.
#[allow(dead_code)]
pub fn proxied_client(proxy: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(format!("http://{}", proxy)).unwrap())
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Values the origin saw for `name`.
#[allow(dead_code)]
pub fn seen_header(echo: &Value, name: &str) -> Vec<String> {
    echo["headers"][name]
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
