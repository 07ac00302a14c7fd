use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use shared::domain::Source;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct EchoServerState {
    captured: Arc<Mutex<Option<Value>>>,
    reply_status: StatusCode,
    reply_body: Value,
}

async fn handle_echo(
    State(state): State<EchoServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    *state.captured.lock().await = Some(payload);
    (state.reply_status, Json(state.reply_body.clone()))
}

async fn spawn_echo_server(
    reply_status: StatusCode,
    reply_body: Value,
) -> (String, Arc<Mutex<Option<Value>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let captured = Arc::new(Mutex::new(None));
    let state = EchoServerState {
        captured: captured.clone(),
        reply_status,
        reply_body,
    };
    let app = Router::new()
        .route("/api/echo", post(handle_echo))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), captured)
}

#[tokio::test]
async fn send_message_posts_payload_and_decodes_envelope() {
    let request = EchoRequest {
        message: "Hello from web!".to_string(),
        timestamp: 1_700_000_000_000,
        source: Source::Web,
    };
    let reply = serde_json::to_value(EchoResponse::new(
        serde_json::to_value(&request).expect("request json"),
    ))
    .expect("reply json");
    let (base_url, captured) = spawn_echo_server(StatusCode::OK, reply).await;

    let client = ApiClient::new(base_url);
    let response = client.send_message(&request).await.expect("send");

    assert!(response.success);
    assert_eq!(
        response.data,
        serde_json::to_value(&request).expect("request json")
    );

    let captured = captured.lock().await.take().expect("captured payload");
    assert_eq!(captured["message"], json!("Hello from web!"));
    assert_eq!(captured["timestamp"], json!(1_700_000_000_000_i64));
    assert_eq!(captured["source"], json!("web"));
}

#[tokio::test]
async fn non_success_status_surfaces_status_error_without_reading_body() {
    let failure = json!({ "success": false, "error": "boom" });
    let (base_url, _captured) =
        spawn_echo_server(StatusCode::INTERNAL_SERVER_ERROR, failure).await;

    let client = ApiClient::new(base_url);
    let err = client
        .send_message(&EchoRequest::new("hi", Source::Desktop))
        .await
        .expect_err("must fail");

    match err {
        DispatchError::Status { status } => assert_eq!(status, 500),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_surfaces_decode_error() {
    let (base_url, _captured) = spawn_echo_server(StatusCode::OK, json!({ "success": true })).await;

    let client = ApiClient::new(base_url);
    let err = client
        .send_message(&EchoRequest::new("hi", Source::Web))
        .await
        .expect_err("must fail");

    match err {
        DispatchError::Decode { source } => assert!(source.is_decode()),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_surfaces_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let client = ApiClient::new(base_url);
    let err = client
        .send_message(&EchoRequest::new("hi", Source::Web))
        .await
        .expect_err("must fail");

    match err {
        DispatchError::Transport { source } => assert!(source.is_connect()),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn injected_transport_timeout_surfaces_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    // Bound but never accepted, so the request stalls until the client
    // timeout fires.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));

    let http = Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .expect("client");
    let client = ApiClient::with_http_client(http, base_url);

    let err = client
        .send_message(&EchoRequest::new("hi", Source::Web))
        .await
        .expect_err("must time out");

    match err {
        DispatchError::Transport { source } => assert!(source.is_timeout()),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[test]
fn base_url_is_fixed_at_construction() {
    let client = ApiClient::new("http://localhost:3000");
    assert_eq!(client.base_url(), "http://localhost:3000");
}
