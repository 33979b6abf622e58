//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn the upstream response into a client response
//! - Remove hop-by-hop headers
//! - Map forwarding failures to HTTP status codes
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the entire body
//! - Upstream redirects and error statuses are relayed unchanged
//! - Upstream timeouts result in 504 Gateway Timeout

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use http_body_util::LengthLimitError;

use crate::http::request::strip_hop_by_hop;

/// Failure while forwarding a single request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("resolved target {url:?} is not a valid URL: {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("resolved target {url:?} has no WebSocket equivalent")]
    UnsupportedScheme { url: String },

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("upstream rejected WebSocket handshake with {0}")]
    WebSocketRejected(StatusCode),

    #[error("upstream WebSocket connection failed: {0}")]
    WebSocket(#[source] tokio_tungstenite::tungstenite::Error),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else {
            ProxyError::Upstream(err)
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ProxyError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        match err {
            tokio_tungstenite::tungstenite::Error::Http(response) => {
                ProxyError::WebSocketRejected(response.status())
            }
            other => ProxyError::WebSocket(other),
        }
    }
}

impl ProxyError {
    /// Classify a request body read failure. Exceeding the limit on a body
    /// without `Content-Length` surfaces here as a wrapped `LengthLimitError`.
    pub fn from_body_error(err: axum::Error, limit: usize) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = source {
            if e.is::<LengthLimitError>() {
                return ProxyError::PayloadTooLarge { limit };
            }
            source = e.source();
        }
        ProxyError::Body(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::UnsupportedScheme { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Body(_) => StatusCode::BAD_REQUEST,
            ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::WebSocketRejected(status)
                if status.is_client_error() || status.is_server_error() =>
            {
                *status
            }
            ProxyError::WebSocketRejected(_) => StatusCode::BAD_GATEWAY,
            ProxyError::WebSocket(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
            StatusCode::BAD_REQUEST => "Unreadable request body",
            StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
            _ => "Upstream request failed",
        };
        (status, message).into_response()
    }
}

/// Convert an upstream response into a streamed client response.
pub fn from_upstream(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
