use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Typed failure taxonomy for the whole core. Every operation returns one of
/// these instead of leaking backend detail past the handler boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Covers both "unknown email" and "wrong password"; the shapes must be
    /// indistinguishable so sign-in cannot be used as an account oracle.
    #[error("Please check your credentials and try again.")]
    InvalidCredentials,

    #[error("User already exists")]
    AccountExists,

    /// No valid, unexpired session on a guarded operation.
    #[error("Unauthorized")]
    Unauthorized,

    /// First violated field on create/update input.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Covers both "no such task" and "owned by someone else".
    #[error("Task not found or you don't have permission to access it")]
    NotFoundOrForbidden,

    /// Unexpected backend failure; the source is logged, the caller only
    /// ever sees the generic message.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn storage(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Storage {
            message,
            source: source.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::AccountExists => StatusCode::CONFLICT,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::storage("Something went wrong. Please try again.", e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage { source, .. } = &self {
            error!(error = %source, "storage failure");
        }
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_first_violated_field() {
        let err = AppError::validation("title", "Title is required");
        match err {
            AppError::Validation { field, ref message } => {
                assert_eq!(field, "title");
                assert_eq!(message, "Title is required");
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn credential_errors_share_one_shape() {
        let unknown_email = AppError::InvalidCredentials;
        let wrong_password = AppError::InvalidCredentials;
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
        assert_eq!(unknown_email.status(), wrong_password.status());
    }

    #[test]
    fn storage_display_hides_the_source() {
        let err = AppError::storage(
            "Something went wrong. Please try again.",
            anyhow::anyhow!("connection refused at 10.0.0.3:5432"),
        );
        assert!(!err.to_string().contains("10.0.0.3"));
    }
}
