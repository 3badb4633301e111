//! HTTP API gateway for GroundCrew.
//!
//! Exposes the chat and upload endpoints plus a health check and the model
//! catalog. Built on Axum; requests arrive as multipart form data carrying
//! the question, model identifier, optional API key, and any uploaded
//! files.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use groundcrew_chat::{ChatError, ChatRequest, ChatService};
use groundcrew_config::AppConfig;
use groundcrew_core::FileRecord;
use groundcrew_core::error::{IndexError, ProviderError};

/// Uploads can carry documents; allow a generous multipart body.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: ChatService,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS open to any origin (the API is consumed by browser frontends)
/// - Request body size limit (25 MB, uploads included)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/models", get(models_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(GatewayState {
        service: ChatService::new(config),
    });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn models_handler() -> Json<Vec<groundcrew_providers::ModelInfo>> {
    Json(groundcrew_providers::catalog())
}

async fn chat_handler(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<groundcrew_chat::ChatResponse>, ApiError> {
    let form = ChatForm::parse(multipart).await?;

    let request = ChatRequest {
        question: form
            .question
            .ok_or_else(|| ApiError::BadRequest("missing form field: question".into()))?,
        model: form
            .model
            .ok_or_else(|| ApiError::BadRequest("missing form field: model".into()))?,
        api_key: form.api_key,
        files: form.files,
    };

    let response = state.service.handle_chat(request).await?;
    Ok(Json(response))
}

async fn upload_handler(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<groundcrew_chat::UploadResponse>, ApiError> {
    let form = ChatForm::parse(multipart).await?;

    let response = state
        .service
        .handle_upload(&form.files, form.api_key.as_deref())
        .await?;
    Ok(Json(response))
}

// --- Multipart form ---

/// Fields shared by the chat and upload endpoints.
#[derive(Default)]
struct ChatForm {
    question: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    files: Vec<FileRecord>,
}

impl ChatForm {
    async fn parse(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
        {
            match field.name() {
                Some("question") => form.question = Some(read_text(field).await?),
                Some("model") => form.model = Some(read_text(field).await?),
                Some("apiKey") => {
                    let key = read_text(field).await?;
                    if !key.is_empty() {
                        form.api_key = Some(key);
                    }
                }
                Some("files") => {
                    let name = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| "upload".into());
                    let content_type = field.content_type().map(str::to_string);

                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::BadRequest(format!("failed to read file {name}: {e}"))
                    })?;

                    let mut record = FileRecord::new(name, bytes.to_vec());
                    if let Some(content_type) = content_type {
                        record = record.with_media_type(content_type);
                    }
                    form.files.push(record);
                }
                // Unknown fields are ignored, not rejected.
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable form field: {e}")))
}

// --- Error mapping ---

/// Gateway-level error: everything a handler can fail with, mapped onto
/// an HTTP status. Credentials never appear in bodies.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Chat(ChatError),
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        ApiError::Chat(e)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Chat(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Chat(ChatError::Provider(ProviderError::Unavailable(msg))) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            ApiError::Chat(ChatError::Provider(ProviderError::Rejected { status, body })) => (
                StatusCode::BAD_GATEWAY,
                format!("upstream provider returned status {status}: {body}"),
            ),
            ApiError::Chat(ChatError::Index(IndexError::BuildFailed(msg))) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::Chat(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
