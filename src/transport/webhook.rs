//! Webhook delivery

use super::TransportError;
use crate::runtime::Incoming;
use crate::telegram::{TelegramClient, Update};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use url::Url;

/// Header Telegram uses to echo the registered secret
const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

const DEFAULT_PATH: &str = "/webhook";

/// State shared across webhook handlers
#[derive(Clone)]
struct WebhookState {
    updates: mpsc::Sender<Incoming>,
    secret: Option<Arc<str>>,
}

/// Register the webhook, then serve it until `shutdown` resolves
pub async fn run(
    client: Arc<TelegramClient>,
    url: &str,
    secret: Option<&str>,
    listen: SocketAddr,
    updates: mpsc::Sender<Incoming>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TransportError> {
    client
        .set_webhook(url, secret)
        .await
        .map_err(TransportError::Registration)?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|source| TransportError::Bind {
            addr: listen,
            source,
        })?;

    let path = webhook_path(url);
    tracing::info!(%listen, path = %path, "Webhook server listening");

    let app = create_router(&path, updates, secret);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(TransportError::Serve)
}

/// Create the webhook router
pub fn create_router(path: &str, updates: mpsc::Sender<Incoming>, secret: Option<&str>) -> Router {
    let state = WebhookState {
        updates,
        secret: secret.map(Arc::from),
    };
    Router::new()
        .route(path, post(receive_update))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Route path taken from the registered URL
fn webhook_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|parsed| parsed.path().to_string())
        .filter(|path| path != "/")
        .unwrap_or_else(|| DEFAULT_PATH.to_string())
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    if let Some(expected) = state.secret.as_deref() {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            tracing::warn!(update_id = update.update_id, "Rejected webhook call with bad secret");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let Some(incoming) = update.into_incoming() else {
        return StatusCode::OK;
    };
    if state.updates.send(incoming).await.is_err() {
        tracing::error!("Runtime closed, cannot accept update");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}
