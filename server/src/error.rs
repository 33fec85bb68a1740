//! Error taxonomy for the HTTP layer.
//!
//! # Design
//! Three outcomes reach the caller: a malformed request (400), an id that
//! resolves to nothing (404), and a store failure (503). Extractor rejections
//! from axum are folded into `BadRequest` so every error body has the same
//! `{"error": "..."}` shape.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("todo {0} not found")]
    NotFound(Uuid),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            AppError::StoreUnavailable(source) => {
                error!(error = %source, "store call failed");
                "store unavailable".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody { error };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
