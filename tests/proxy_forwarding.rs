//! End-to-end forwarding tests against a local echo upstream.

use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use spa_proxy::{ProxyServer, TargetResolver};

mod common;

#[tokio::test]
async fn test_application_route_goes_under_app_namespace() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/")).await;

    let body = common::client()
        .get(format!("http://{proxy}/dashboard"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with("GET /apps/myapp/dashboard\n"), "got {body:?}");
    shutdown.trigger();
}

#[tokio::test]
async fn test_static_asset_goes_to_root() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/")).await;

    let body = common::client()
        .get(format!("http://{proxy}/css/styles.css"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with("GET /css/styles.css\n"), "got {body:?}");
    shutdown.trigger();
}

#[tokio::test]
async fn test_framework_endpoint_keeps_query() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/")).await;

    let response = common::client()
        .post(format!("http://{proxy}/_blazor/negotiate?negotiateVersion=1&id=1"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        "POST /_blazor/negotiate?negotiateVersion=1&id=1\n127.0.0.1\n{}"
    );
    shutdown.trigger();
}

#[tokio::test]
async fn test_root_request_trims_trailing_slash() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/")).await;

    let body = common::client()
        .get(format!("http://{proxy}/?tab=2"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with("GET /apps/myapp?tab=2\n"), "got {body:?}");
    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/")).await;

    let response = common::client()
        .get(format!("http://{proxy}/counter"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    shutdown.trigger();
}

#[derive(Debug)]
struct FixedTarget(String);

impl TargetResolver for FixedTarget {
    fn resolve_target_url(&self, _path_info: &str, _query: &str) -> String {
        self.0.clone()
    }
}

#[tokio::test]
async fn test_upstream_redirect_is_relayed() {
    let upstream = common::start_echo_backend().await;
    let resolver = Arc::new(FixedTarget(format!("http://{upstream}/redirect")));
    let server =
        ProxyServer::with_resolver(common::runtime_config(upstream, "/"), resolver).unwrap();
    let (proxy, shutdown) = common::start_server(server).await;

    let response = common::client()
        .get(format!("http://{proxy}/anything"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get("location").unwrap(), "/elsewhere");
    shutdown.trigger();
}

#[tokio::test]
async fn test_prefixed_entry_point() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/portal")).await;
    let client = common::client();

    let body = client
        .get(format!("http://{proxy}/portal/fetchdata"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.starts_with("GET /apps/myapp/fetchdata\n"), "got {body:?}");

    let body = client
        .get(format!("http://{proxy}/portal"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.starts_with("GET /apps/myapp\n"), "got {body:?}");

    let outside = client
        .get(format!("http://{proxy}/elsewhere"))
        .send()
        .await
        .unwrap();
    assert_eq!(outside.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let upstream = common::start_echo_backend().await;
    let mut config = common::runtime_config(upstream, "/");
    config.limits.max_request_body_bytes = 16;
    let (proxy, shutdown) = common::start_proxy(config).await;

    let response = common::client()
        .post(format!("http://{proxy}/upload"))
        .body(vec![b'x'; 64])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_chunked_body_is_rejected() {
    let upstream = common::start_echo_backend().await;
    let mut config = common::runtime_config(upstream, "/");
    config.limits.max_request_body_bytes = 16;
    let (proxy, shutdown) = common::start_proxy(config).await;

    // A streamed body has no Content-Length, so the limit trips while reading.
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![Ok(vec![b'x'; 32]), Ok(vec![b'x'; 32])];
    let response = common::client()
        .post(format!("http://{proxy}/upload"))
        .body(reqwest::Body::wrap_stream(futures_util::stream::iter(chunks)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind and drop to get a port with nothing listening.
    let unused = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(unused, "/")).await;

    let response = common::client()
        .get(format!("http://{proxy}/dashboard"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    shutdown.trigger();
}

#[tokio::test]
async fn test_websocket_is_relayed() {
    let upstream = common::start_echo_backend().await;
    let (proxy, shutdown) = common::start_proxy(common::runtime_config(upstream, "/")).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{proxy}/_blazor?id=1"))
        .await
        .unwrap();

    socket.send(Message::text("hello")).await.unwrap();
    let reply = socket.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "/_blazor?id=1 hello");

    let _ = socket.close(None).await;
    shutdown.trigger();
}
