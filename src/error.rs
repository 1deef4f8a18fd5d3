use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::validation::FieldError;

/// Why an authentication attempt was rejected. Only ever logged; callers
/// see a generic 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    BadCredentials,
    MissingToken,
    Expired,
    Malformed,
    WrongKind,
    UserNotFound,
    TokenMismatch,
    RefreshDisabled,
}

impl AuthFailure {
    fn public_message(self) -> &'static str {
        match self {
            AuthFailure::BadCredentials => "Invalid credentials",
            _ => "Unauthorized",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("unauthorized ({0:?})")]
    Unauthorized(AuthFailure),

    #[error("{0}")]
    NotFound(String),

    #[error("upload failed: {0:#}")]
    Upload(anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upload(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::InvalidRequest(msg) => json!({
                "error": { "type": "invalid_request", "message": msg }
            }),
            AppError::Validation(errors) => json!({
                "error": {
                    "type": "invalid_request",
                    "message": "Validation failed",
                    "details": errors,
                }
            }),
            AppError::Unauthorized(reason) => {
                warn!(?reason, "request unauthorized");
                json!({
                    "error": { "type": "unauthorized", "message": reason.public_message() }
                })
            }
            AppError::NotFound(msg) => json!({
                "error": { "type": "not_found", "message": msg }
            }),
            AppError::Upload(e) => {
                error!(error = %format!("{e:#}"), "media upload failed");
                json!({
                    "error": { "type": "upload_failed", "message": format!("{e:#}") }
                })
            }
            AppError::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                json!({
                    "error": { "type": "internal_error", "message": "An internal error occurred" }
                })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(AppError::InvalidRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unauthorized(AuthFailure::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Upload(anyhow::anyhow!("boom")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unauthorized_reasons_share_one_public_message() {
        for reason in [
            AuthFailure::Expired,
            AuthFailure::Malformed,
            AuthFailure::UserNotFound,
            AuthFailure::TokenMismatch,
            AuthFailure::WrongKind,
        ] {
            assert_eq!(reason.public_message(), "Unauthorized");
        }
        assert_eq!(AuthFailure::BadCredentials.public_message(), "Invalid credentials");
    }
}
