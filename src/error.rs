use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Every failure a flow can report to the HTTP layer.
///
/// Expected outcomes (bad credentials, missing or foreign resources) have their own
/// variants. Anything else is an [`anyhow::Error`] carried by `Internal` and is
/// never shown to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Email is already registered")]
    EmailAlreadyRegistered,
    #[error("User not found.")]
    UserNotFound,
    #[error("Invalid credential")]
    InvalidPassword,
    #[error("Session not found")]
    SessionNotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("You are not allowed to access this resource")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmailAlreadyRegistered => StatusCode::CONFLICT,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidPassword | AppError::BadRequest(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::SessionNotFound | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmailAlreadyRegistered => "EMAIL_REGISTERED_ERROR",
            AppError::UserNotFound | AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidPassword => "INVALID_CREDENTIAL",
            AppError::SessionNotFound | AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message safe to put in a response body.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
    /// Stable machine-readable kind, e.g. `NOT_FOUND`.
    #[schema(value_type = String, example = "NOT_FOUND")]
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(e) = &self {
            error!(error = ?e, "unhandled error");
        }
        let body = ErrorBody {
            error: true,
            message: self.public_message(),
            code: self.code(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = AppError::from(anyhow::anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn credential_failures_map_to_distinct_statuses() {
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidPassword.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidPassword.code(), "INVALID_CREDENTIAL");
        assert_eq!(AppError::EmailAlreadyRegistered.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::SessionNotFound.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn response_body_carries_message_and_code() {
        let res = AppError::not_found("Category not found").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Category not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
