//! HTTP gateway: Green API webhook intake plus a manual send endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::agent::ConversationEngine;
use crate::whatsapp::{GreenApiClient, IncomingMessage, Notification, extract_incoming};

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppState {
    engine: ConversationEngine,
    whatsapp: GreenApiClient,
    turn_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AppState {
    pub fn new(engine: ConversationEngine, whatsapp: GreenApiClient) -> Self {
        Self {
            engine,
            whatsapp,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// One async mutex per contact. Holding it across a turn keeps
    /// concurrent webhooks for the same number from interleaving their
    /// history read-modify-write. Entries are never removed.
    async fn turn_lock(&self, contact_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.turn_locks.lock().await;
        locks.entry(contact_id.to_string()).or_default().clone()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .route("/send", post(send))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Webhook: listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Runs the whole conversational turn inline and answers the gateway only
/// after the reply has been handed to the Green API. Notifications that
/// carry no processable message are acknowledged with their filter status
/// so the gateway does not retry them.
async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(notification): Json<Notification>,
) -> (StatusCode, Json<serde_json::Value>) {
    let IncomingMessage { contact_id, text } = match extract_incoming(&notification) {
        Ok(incoming) => incoming,
        Err(status) => {
            tracing::debug!("Webhook: notification filtered ({status})");
            return (StatusCode::OK, Json(json!({ "status": status })));
        }
    };
    tracing::info!("Webhook: message from {contact_id}");

    let lock = state.turn_lock(&contact_id).await;
    let _turn = lock.lock().await;

    match state.engine.handle_message(&contact_id, &text).await {
        Ok(answer) => {
            // The turn is already persisted; a lost delivery is logged,
            // not retried.
            if let Err(e) = state.whatsapp.send_message(&contact_id, &answer).await {
                tracing::error!("Webhook: delivery to {contact_id} failed: {e:#}");
            }
            (StatusCode::OK, Json(json!({ "status": "success" })))
        }
        Err(e) => {
            tracing::error!("Webhook: turn for {contact_id} failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct SendRequest {
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

async fn send(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let phone = request.phone.filter(|p| !p.is_empty());
    let text = request.text.filter(|t| !t.is_empty());
    let (Some(phone), Some(text)) = (phone, text) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "phone and text are required" })),
        );
    };

    match state.whatsapp.send_message(&phone, &text).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "sent" }))),
        Err(e) => {
            tracing::error!("Webhook: manual send to {phone} failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "failed" })),
            )
        }
    }
}
