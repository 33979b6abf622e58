//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router for the configured entry point
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Resolve the upstream URL once per request
//! - Forward HTTP requests and WebSocket upgrades to the upstream

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ws::WebSocketUpgrade, ConnectInfo, FromRequestParts, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RuntimeConfig;
use crate::http::request::{content_length, upstream_headers, X_REQUEST_ID};
use crate::http::response::{self, ProxyError};
use crate::http::websocket;
use crate::routing::entry::{EntryPoint, EntryPointError};
use crate::routing::{AppResolver, TargetResolver};

/// Error type for server construction and serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid entry point: {0}")]
    EntryPoint(#[from] EntryPointError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn TargetResolver>,
    pub entry: Arc<EntryPoint>,
    pub client: reqwest::Client,
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: usize,
}

/// HTTP server for the proxy.
pub struct ProxyServer {
    router: Router,
    config: RuntimeConfig,
}

impl ProxyServer {
    /// Create a new server resolving targets for the configured application.
    pub fn new(config: RuntimeConfig) -> Result<Self, ServerError> {
        let resolver = Arc::new(AppResolver::new(config.routing.clone()));
        Self::with_resolver(config, resolver)
    }

    /// Create a new server around a custom resolver.
    pub fn with_resolver(
        config: RuntimeConfig,
        resolver: Arc<dyn TargetResolver>,
    ) -> Result<Self, ServerError> {
        let entry = EntryPoint::parse(&config.routing.entry_point)?;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(config.timeouts.connect())
            .pool_idle_timeout(config.timeouts.pool_idle())
            .build()?;

        let state = AppState {
            resolver,
            entry: Arc::new(entry.clone()),
            client,
            request_timeout: config.timeouts.request(),
            max_body_bytes: config.limits.max_request_body_bytes,
        };

        let router = Self::build_router(&entry, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(entry: &EntryPoint, state: AppState) -> Router {
        let mut router = Router::new();
        for pattern in entry.route_patterns() {
            router = router.route(&pattern, any(proxy_handler));
        }

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            entry_point = %self.config.routing.entry_point,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Resolves the upstream URL and forwards the request.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let target = {
        let uri = request.uri();
        let path_info = state.entry.path_info(uri.path()).unwrap_or_default();
        state
            .resolver
            .resolve_target_url(path_info, uri.query().unwrap_or_default())
    };

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        target = %target,
        "Proxying request"
    );

    let result = if websocket::is_upgrade_request(request.headers()) {
        forward_websocket(&state, request, &target, request_id.clone()).await
    } else {
        forward_http(&state, request, client_addr, &target).await
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(request_id = %request_id, target = %target, error = %e, "Forwarding failed");
            e.into_response()
        }
    }
}

async fn forward_http(
    state: &AppState,
    request: Request<Body>,
    client_addr: SocketAddr,
    target: &str,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let limit = state.max_body_bytes;
    if content_length(&parts.headers).is_some_and(|len| len > limit) {
        return Err(ProxyError::PayloadTooLarge { limit });
    }
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ProxyError::from_body_error(e, limit))?;

    let url = reqwest::Url::parse(target).map_err(|source| ProxyError::InvalidTarget {
        url: target.to_string(),
        source,
    })?;

    let mut upstream = state
        .client
        .request(parts.method, url)
        .headers(upstream_headers(&parts.headers, client_addr))
        .body(body);
    if let Some(timeout) = state.request_timeout {
        upstream = upstream.timeout(timeout);
    }

    let upstream_response = upstream.send().await?;
    tracing::debug!(status = %upstream_response.status(), target = %target, "Upstream responded");

    Ok(response::from_upstream(upstream_response))
}

async fn forward_websocket(
    state: &AppState,
    request: Request<Body>,
    target: &str,
    request_id: String,
) -> Result<Response, ProxyError> {
    let (mut parts, _body) = request.into_parts();
    let upgrade = match WebSocketUpgrade::from_request_parts(&mut parts, state).await {
        Ok(upgrade) => upgrade,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    websocket::proxy_websocket(upgrade, &parts.headers, target, request_id).await
}
