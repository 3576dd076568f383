use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::error::RelayError;
use crate::llm::{ChatCompletionsDriver, GenerationRequest, Message, ProviderSettings};
use crate::ui;

/// Build the application router.
///
/// Routes:
/// - `GET /`: page shell with the chat widget and the trade form
/// - `POST /api/chat`: relay to the text-generation provider
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/chat", post(api_chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: ProviderSettings) -> anyhow::Result<()> {
    info!(
        name: "provider.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        provider = ?settings.provider,
        has_api_key = settings.api_key.is_some(),
        "Provider configuration loaded"
    );
    if settings.api_key.is_none() {
        tracing::warn!("No provider API key configured; relay requests will be sent unauthenticated");
    }

    let state = AppState {
        generator: Arc::new(ChatCompletionsDriver::new(settings)),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<Message>,
}

/// GET / - Page shell.
async fn index_handler() -> impl IntoResponse {
    Html(ui::page())
}

/// POST /api/chat - Forward the conversation and stream the generated text.
///
/// The body is the provider's text, fragment by fragment, with no framing.
async fn api_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Response, RelayError> {
    let request_id = uuid::Uuid::new_v4();
    tracing::debug!(
        name: "relay.request",
        request_id = %request_id,
        message_count = req.messages.len(),
        "Relaying chat request"
    );

    let stream = state
        .generator
        .stream(GenerationRequest::new(req.messages))
        .await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}
