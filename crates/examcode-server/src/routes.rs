//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use examcode_core::ClassificationResult;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/get_type_code_examen", post(get_type_code_examen))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Inbound patient request
#[derive(Debug, Deserialize)]
struct ExamRequest {
    #[serde(default)]
    text: Option<String>,
}

/// Resolved exam, field names as consumed by the booking front-end
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamResponse {
    pub type_examen: Option<String>,
    pub type_examen_id: Option<String>,
    pub code_examen: Option<String>,
    pub code_examen_id: Option<String>,
}

impl From<ClassificationResult> for ExamResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            type_examen: result.category,
            type_examen_id: result.identifier,
            code_examen: result.selected_label,
            code_examen_id: result.selected_code,
        }
    }
}

/// Classify a patient query and resolve its exam code.
///
/// A `text` that is not a string is a malformed body (400), as is any JSON
/// syntax error.
async fn get_type_code_examen(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ExamResponse>, AppError> {
    metrics::counter!("examcode_requests_total").increment(1);

    let body = body?;
    let request: ExamRequest = serde_json::from_slice(&body)?;
    let text = match request.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(AppError::MissingQuery),
    };

    info!("Processing exam request ({} chars)", text.chars().count());
    let result = state.pipeline.run(&text).await;

    Ok(Json(result.into()))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Turn a handler panic into a 500 carrying the panic message
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown error".to_string()
    };

    AppError::Internal(message).into_response()
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    MissingQuery,
    InvalidRequest(String),
    PayloadTooLarge,
    Internal(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::MissingQuery => "missing_query",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::PayloadTooLarge => "payload_too_large",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidRequest(rejection.body_text())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        metrics::counter!("examcode_errors_total", "kind" => self.kind()).increment(1);

        let (status, message) = match self {
            AppError::MissingQuery => {
                warn!("Request without query text");
                (
                    StatusCode::BAD_REQUEST,
                    "No query provided in request body".to_string(),
                )
            }
            AppError::InvalidRequest(msg) => {
                warn!("Invalid request body: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::PayloadTooLarge => {
                warn!("Request body over {} bytes rejected", MAX_BODY_BYTES);
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body exceeds {} bytes", MAX_BODY_BYTES),
                )
            }
            AppError::Internal(msg) => {
                error!("Error processing request: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
