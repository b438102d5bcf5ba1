use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::compiler::CompilerService;
use crate::config::Config;
use crate::models::{CompileRequest, CompileResponse, ErrorResponse, UploadResponse};
use crate::storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub compiler: CompilerService,
    pub blob: Arc<BlobStore>,
    pub config: Arc<Config>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/v1/compile", post(compile_component))
        .route("/api/v1/image", post(upload_image))
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Skeleton compiler is running" }))
}

#[axum::debug_handler]
pub async fn compile_component(
    State(state): State<AppState>,
    Json(body): Json<CompileRequest>,
) -> Response {
    if body.payload.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Component is required");
    }

    // The request-supplied key wins; the env key is a fallback only.
    let api_key = if body.api_key.is_empty() {
        state.config.fallback_api_key.clone().unwrap_or_default()
    } else {
        body.api_key.clone()
    };

    match state.compiler.compile(&body.payload, body.mode, &api_key).await {
        Ok(html) => Json(CompileResponse { html }).into_response(),
        Err(e) => {
            // Full detail stays server-side; the caller sees an opaque message.
            error!("❌ Compile failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not compile the code")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub filename: String,
}

pub async fn upload_image(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    if params.filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Filename is required");
    }

    match state.blob.upload(&params.filename, body).await {
        Ok(url) => Json(UploadResponse { url }).into_response(),
        Err(e) => {
            error!("❌ Image upload failed: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not upload the image",
            )
        }
    }
}
