use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::{error, info};
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;

use crate::app::{App, SlackRequest};

/// Slack slash command payloads are a few hundred bytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
}

pub fn create_server(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/slack/events", post(handle_slack_request))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(AppState { app })
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Slack /play handler is running",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn handle_slack_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match state.app.dispatch(SlackRequest { headers, body }).await {
        Ok(response) => (response.status, response.body).into_response(),
        Err(e) => {
            error!("❌ Slack request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn start_http_server(app: App, port: u16) -> Result<()> {
    let router = create_server(Arc::new(app));

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow!("Failed to bind to port {}: {}", port, e))?;

    info!("HTTP server starting on port {}", port);
    info!("Slash command endpoint: http://0.0.0.0:{}/slack/events", port);

    axum::serve(listener, router)
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
