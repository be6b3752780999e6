//! Maps handler failures to JSON responses.
//!
//! Every body has a `message` field; validation failures also carry the
//! field-level `errors` list. Internal errors are logged here and replaced
//! with a generic message so nothing about the server leaks to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::users::repo_types::StoreError;
use crate::validation::FieldError;

pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Domain rejection reported as 400 (bad login, deactivated account, wrong current password).
    #[error("{0}")]
    BadRequest(String),

    /// Duplicate username or email. Reported as 400 for client compatibility.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => AppError::Conflict("Username or email already exists".into()),
            StoreError::Database(e) => AppError::Internal(anyhow::Error::new(e).context("user store")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => json!({
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                json!({ "message": SERVER_ERROR_MESSAGE })
            }
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
