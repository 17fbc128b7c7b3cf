//! HTTP channel: `POST /api/messages` runs one turn and answers with the
//! activities the bot sent during it.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shared::{Activity, Result, ServiceError};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::bot::{BufferedSender, TurnDispatcher};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<TurnDispatcher>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub activities: Vec<Activity>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", post(messages_handler))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(dispatcher: Arc<TurnDispatcher>, port: u16) -> Result<()> {
    tracing::info!("Starting HTTP channel on port {}...", port);

    let app = router(AppState { dispatcher });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| ServiceError::Channel(format!("Failed to bind port {}: {}", port, e)))?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("HTTP channel listening on {}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| ServiceError::Channel(format!("HTTP server error: {}", e)))
}

async fn messages_handler(
    State(state): State<AppState>,
    Json(activity): Json<Activity>,
) -> Result<Json<TurnResponse>> {
    let sender = BufferedSender::new();

    let activities = state
        .dispatcher
        .run(activity, &sender)
        .await
        .map_err(|e| {
            tracing::error!("Turn failed: {}", e);
            e
        })?;

    Ok(Json(TurnResponse { activities }))
}

async fn health_check() -> &'static str {
    "OK"
}
