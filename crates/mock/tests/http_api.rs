//! Integration tests for the mock API over real HTTP.
//!
//! Each test serves the router on an ephemeral loopback port and drives it
//! with reqwest, asserting the exact payloads the OpenEmote client relies
//! on.

use std::net::SocketAddr;

use serde_json::{json, Value};

use emotekit_core::config::MockConfig;
use emotekit_mock::MockServer;

/// Serve the mock router on an ephemeral port, returning its address.
async fn spawn_server() -> SocketAddr {
    let server = MockServer::new(MockConfig::default());
    let router = server.router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> reqwest::Response {
    reqwest::get(format!("http://{}{}", addr, path))
        .await
        .expect("request")
}

#[tokio::test]
async fn test_health_endpoints() {
    let addr = spawn_server().await;

    for path in ["/health", "/api/health"] {
        let resp = get(addr, path).await;
        assert_eq!(resp.status(), 200, "path {}", path);
        let body: Value = resp.json().await.expect("json body");
        assert_eq!(body, json!({"ok": true, "name": "openemote-mock"}));
    }
}

#[tokio::test]
async fn test_global_emotes() {
    let addr = spawn_server().await;

    for path in ["/v1/emotes/global", "/api/emotes/global"] {
        let resp = get(addr, path).await;
        assert_eq!(resp.status(), 200, "path {}", path);
        let body: Value = resp.json().await.expect("json body");
        assert_eq!(body["emotes"][0]["code"], "OPENHYPE");
        assert_eq!(
            body["emotes"][0]["urls"]["1x"],
            "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/1.0"
        );
        assert_eq!(body["emotes"][0]["tooltip"], "OpenEmote mock global");
    }
}

#[tokio::test]
async fn test_channel_emotes() {
    let addr = spawn_server().await;

    for path in [
        "/v1/emotes/twitch/12345",
        "/api/emotes/channel/anything",
        "/v1/emotes/twitch/nested/channel/id",
    ] {
        let resp = get(addr, path).await;
        assert_eq!(resp.status(), 200, "path {}", path);
        let body: Value = resp.json().await.expect("json body");
        assert_eq!(body["emotes"][0]["code"], "OPENWAVE", "path {}", path);
        assert_eq!(body["emotes"][0]["homepage"], "https://example.com/openwave");
    }
}

#[tokio::test]
async fn test_unknown_path_is_structured_404() {
    let addr = spawn_server().await;

    for path in ["/unknown/path", "/v1/emotes", "/api/emotes/global/extra"] {
        let resp = get(addr, path).await;
        assert_eq!(resp.status(), 404, "path {}", path);
        let body: Value = resp.json().await.expect("json body");
        assert_eq!(body, json!({"ok": false, "error": "not_found"}), "path {}", path);
    }
}

#[tokio::test]
async fn test_query_parameters_are_ignored() {
    let addr = spawn_server().await;

    let resp = get(addr, "/health?probe=1&x=y").await;
    assert_eq!(resp.status(), 200);

    let resp = get(addr, "/v1/emotes/twitch/12345?known_revision=7").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["emotes"][0]["code"], "OPENWAVE");
}

#[tokio::test]
async fn test_json_headers() {
    let addr = spawn_server().await;

    for (path, status) in [("/api/emotes/global", 200), ("/nope", 404)] {
        let resp = get(addr, path).await;
        assert_eq!(resp.status(), status);
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "path {}", path);

        let declared = resp.content_length();
        let body = resp.bytes().await.expect("body bytes");
        assert_eq!(declared, Some(body.len() as u64), "path {}", path);
    }
}
