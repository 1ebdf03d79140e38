use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::jwt::TokenError;

/// Failures raised by the user and post repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched; for updates this also covers rows owned by someone else.
    #[error("no matching record")]
    NotFound,
    #[error("unique constraint violated")]
    Conflict,
    #[error("malformed record id: {0}")]
    InvalidId(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps unique violations to `Conflict`, everything else to `Database`.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        let unique = err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if unique {
            StoreError::Conflict
        } else {
            StoreError::Database(err)
        }
    }
}

/// Why the auth gate rejected a request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized: No token provided")]
    MissingToken,
    #[error("Unauthorized: Invalid token format")]
    MalformedHeader,
    #[error("Unauthorized: Token verification failed")]
    VerificationFailed(#[source] TokenError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid Inputs")]
    InvalidInput,
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Generic write/read failure on post routes. 411 is kept for compatibility
/// with existing clients.
const STORE_FAILURE_STATUS: StatusCode = StatusCode::LENGTH_REQUIRED;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput => (StatusCode::BAD_REQUEST, "Invalid Inputs").into_response(),
            ApiError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": reason.to_string() })),
            )
                .into_response(),
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Store(err) => {
                tracing::warn!(error = %err, "store operation failed");
                (STORE_FAILURE_STATUS, Json(json!({ "message": "Invalid" }))).into_response()
            }
        }
    }
}
