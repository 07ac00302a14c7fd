use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{error::EchoFailure, protocol::EchoResponse};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use tracing::{error, info};

mod config;

use config::load_settings;

const MAX_ECHO_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let app = build_router();

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "echo service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router() -> Router {
    // The CORS layer is outermost so even rejected requests carry the
    // wildcard origin header.
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/echo", post(echo))
        .layer(RequestBodyLimitLayer::new(MAX_ECHO_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn healthz() -> &'static str {
    "ok"
}

async fn echo(body: Bytes) -> Result<Json<EchoResponse>, (StatusCode, Json<EchoFailure>)> {
    let data: Value = if body.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body).map_err(|error| {
            error!(%error, "echo request body is not valid JSON");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(EchoFailure::new(error.to_string())),
            )
        })?
    };

    info!(%data, "received echo request");
    Ok(Json(EchoResponse::new(data)))
}
