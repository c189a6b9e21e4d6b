use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::constants::*;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Every failure a handler can surface. Messages are safe to send to clients;
/// underlying causes are logged where the error is built.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", ERR_TOKEN_MISSING)]
    MissingToken,

    #[error("{}", ERR_TOKEN_INVALID)]
    InvalidToken,

    #[error("{}", ERR_INVALID_USER)]
    InvalidUser,

    #[error("{}", ERR_INVALID_PASSWORD)]
    InvalidPassword,

    #[error("{}", ERR_USER_EXISTS)]
    UserExists,

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("error {context}.")]
    Storage {
        status: StatusCode,
        context: &'static str,
    },

    #[error("{}", ERR_INTERNAL)]
    Internal(&'static str),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Logs the storage failure and returns a sanitized error carrying `status`.
    pub fn storage(status: StatusCode, context: &'static str, err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "error {}", context);
        ApiError::Storage { status, context }
    }

    pub fn internal(context: &'static str, err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "{}", context);
        ApiError::Internal(context)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::InvalidUser => StatusCode::FORBIDDEN,
            ApiError::InvalidPassword | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UserExists | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "msg": self.to_string() }));
        (self.status(), body).into_response()
    }
}
