//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    http::{HeaderMap, Method, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;

use spa_proxy::config::{ListenerConfig, ProxyConfig, RemoteServerConfig, RuntimeConfig};
use spa_proxy::{ProxyServer, Shutdown};

/// Start an upstream that echoes what it received:
/// `"{METHOD} {path?query}\n{x-forwarded-for}\n{body}"`.
/// WebSocket upgrades on `/_blazor...` echo each text frame prefixed with the URI.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/_blazor", any(ws_echo))
        .route("/redirect", any(|| async {
            (
                axum::http::StatusCode::FOUND,
                [(axum::http::header::LOCATION, "/elsewhere")],
            )
        }))
        .fallback(echo);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> String {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    format!(
        "{} {}\n{}\n{}",
        method,
        uri,
        forwarded_for,
        String::from_utf8_lossy(&body)
    )
}

async fn ws_echo(uri: Uri, upgrade: WebSocketUpgrade) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| ws_echo_loop(socket, uri))
}

async fn ws_echo_loop(mut socket: WebSocket, uri: Uri) {
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                let reply = format!("{} {}", uri, text.as_str());
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

/// Runtime config for an application `myapp` under `/apps` on the given upstream.
pub fn runtime_config(upstream: SocketAddr, entry_point: &str) -> RuntimeConfig {
    ProxyConfig {
        remote_server: RemoteServerConfig {
            uri: Some(format!("http://{upstream}")),
        },
        application_id: Some("myapp".into()),
        applications_root: Some("/apps".into()),
        entry_point: Some(entry_point.into()),
        proxy_server: ListenerConfig {
            host: Some("127.0.0.1".into()),
            port: Some(0),
        },
        ..Default::default()
    }
    .validate()
    .unwrap()
}

/// Start the proxy on an ephemeral port. Returns its address and the
/// shutdown handle keeping it alive.
pub async fn start_proxy(config: RuntimeConfig) -> (SocketAddr, Shutdown) {
    start_server(ProxyServer::new(config).unwrap()).await
}

/// Serve an already built proxy on an ephemeral port.
pub async fn start_server(server: ProxyServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
