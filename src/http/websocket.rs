//! WebSocket proxy handling.
//!
//! # Responsibilities
//! - Detect WebSocket upgrade requests
//! - Establish WebSocket connection to the upstream before accepting the client
//! - Complete upgrade handshake with client
//! - Bidirectional frame forwarding
//!
//! # Data Flow
//! ```text
//! Client ←──── WebSocket frames ────→ Proxy ←──── WebSocket frames ────→ Upstream
//! ```
//!
//! # Design Decisions
//! - Upstream handshake failures are reported to the client as HTTP errors
//! - Frame-level forwarding (no message buffering)
//! - Close frames propagated in both directions

use axum::{
    extract::ws::{self, WebSocket, WebSocketUpgrade},
    http::{header, HeaderMap},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    tungstenite::{
        self,
        client::IntoClientRequest,
        protocol::{frame::coding::CloseCode, CloseFrame},
    },
    MaybeTlsStream, WebSocketStream,
};

use crate::http::response::ProxyError;

type UpstreamSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client headers carried over to the upstream handshake.
const FORWARDED_HEADERS: [header::HeaderName; 4] = [
    header::COOKIE,
    header::AUTHORIZATION,
    header::USER_AGENT,
    header::SEC_WEBSOCKET_PROTOCOL,
];

/// True if the request asks for a WebSocket upgrade.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

/// Map an http(s) target URL onto the matching ws(s) URL.
pub fn websocket_url(target: &str) -> Option<String> {
    if let Some(rest) = target.strip_prefix("https://") {
        Some(format!("wss://{rest}"))
    } else {
        target
            .strip_prefix("http://")
            .map(|rest| format!("ws://{rest}"))
    }
}

/// Connect to the upstream WebSocket and, once connected, accept the client
/// upgrade and relay frames between the two.
pub async fn proxy_websocket(
    upgrade: WebSocketUpgrade,
    headers: &HeaderMap,
    target: &str,
    request_id: String,
) -> Result<Response, ProxyError> {
    let url = websocket_url(target).ok_or_else(|| ProxyError::UnsupportedScheme {
        url: target.to_string(),
    })?;

    let mut request = url.as_str().into_client_request()?;
    for name in FORWARDED_HEADERS {
        if let Some(value) = headers.get(&name) {
            request.headers_mut().insert(name, value.clone());
        }
    }

    let (upstream, handshake) = tokio_tungstenite::connect_async(request).await?;
    let protocol = handshake
        .headers()
        .get(header::SEC_WEBSOCKET_PROTOCOL)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    tracing::debug!(request_id = %request_id, target = %url, "Upstream WebSocket connected");

    let upgrade = match protocol {
        Some(protocol) => upgrade.protocols([protocol]),
        None => upgrade,
    };

    Ok(upgrade.on_upgrade(move |client| relay(client, upstream, request_id)))
}

/// Forward frames until either side closes or fails.
async fn relay(client: WebSocket, upstream: UpstreamSocket, request_id: String) {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    let client_to_upstream = async {
        while let Some(Ok(message)) = client_rx.next().await {
            let closing = matches!(message, ws::Message::Close(_));
            if upstream_tx.send(to_upstream(message)).await.is_err() || closing {
                break;
            }
        }
        let _ = upstream_tx.close().await;
    };

    let upstream_to_client = async {
        while let Some(Ok(message)) = upstream_rx.next().await {
            let Some(message) = to_client(message) else {
                continue;
            };
            let closing = matches!(message, ws::Message::Close(_));
            if client_tx.send(message).await.is_err() || closing {
                break;
            }
        }
        let _ = client_tx.close().await;
    };

    tokio::select! {
        _ = client_to_upstream => {
            tracing::debug!(request_id = %request_id, "Client closed WebSocket");
        }
        _ = upstream_to_client => {
            tracing::debug!(request_id = %request_id, "Upstream closed WebSocket");
        }
    }
}

fn to_upstream(message: ws::Message) -> tungstenite::Message {
    match message {
        ws::Message::Text(text) => tungstenite::Message::Text(text.as_str().to_owned().into()),
        ws::Message::Binary(data) => tungstenite::Message::Binary(data),
        ws::Message::Ping(data) => tungstenite::Message::Ping(data),
        ws::Message::Pong(data) => tungstenite::Message::Pong(data),
        ws::Message::Close(frame) => tungstenite::Message::Close(frame.map(|f| CloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason.as_str().to_owned().into(),
        })),
    }
}

fn to_client(message: tungstenite::Message) -> Option<ws::Message> {
    let message = match message {
        tungstenite::Message::Text(text) => ws::Message::Text(text.as_str().to_owned().into()),
        tungstenite::Message::Binary(data) => ws::Message::Binary(data),
        tungstenite::Message::Ping(data) => ws::Message::Ping(data),
        tungstenite::Message::Pong(data) => ws::Message::Pong(data),
        tungstenite::Message::Close(frame) => ws::Message::Close(frame.map(|f| ws::CloseFrame {
            code: f.code.into(),
            reason: f.reason.as_str().to_owned().into(),
        })),
        // Raw frames are never yielded when reading.
        tungstenite::Message::Frame(_) => return None,
    };
    Some(message)
}
