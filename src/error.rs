//! API error taxonomy and its translation into the response envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Multipart upload rejections, one variant per client-visible message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File too large. Maximum size is 5MB.")]
    FileTooLarge,
    #[error("Too many files. Maximum is 5 files.")]
    TooManyFiles,
    #[error("Unexpected field name for file upload.")]
    UnexpectedField,
    #[error("Only JPEG, PNG, and WEBP images are allowed")]
    UnsupportedType,
    #[error("File upload error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Single-message field validation failure (first failing field wins).
    #[error("{0}")]
    Validation(String),

    /// Itemized validation failure, rendered with an `errors` list.
    #[error("Validation failed")]
    Invalid(Vec<String>),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("No token provided. Access denied.")]
    MissingToken,

    #[error("Invalid token. Please login again.")]
    InvalidToken,

    #[error("Token expired. Please login again.")]
    ExpiredToken,

    #[error("Invalid credentials. Please check your email/username and password.")]
    InvalidCredentials,

    #[error("Account is deactivated. Please contact support.")]
    AccountDeactivated,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("SQL request failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            Validation(_) | Invalid(_) | DuplicateEmail | DuplicateUsername | Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            MissingToken | InvalidToken | ExpiredToken | InvalidCredentials
            | AccountDeactivated => StatusCode::UNAUTHORIZED,
            NotFound(_) => StatusCode::NOT_FOUND,
            Forbidden(_) => StatusCode::FORBIDDEN,
            Sql(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details are logged, never sent to the client.
        let (message, errors) = match &self {
            ApiError::Sql(e) => {
                error!(error = %e, "database error");
                ("Server error. Please try again later.".to_string(), None)
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                ("Server error. Please try again later.".to_string(), None)
            }
            ApiError::Invalid(list) => (self.to_string(), Some(list.clone())),
            _ => (self.to_string(), None),
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_remain_distinguishable() {
        assert_ne!(
            ApiError::ExpiredToken.to_string(),
            ApiError::InvalidToken.to_string()
        );
        assert_eq!(
            ApiError::ExpiredToken.to_string(),
            "Token expired. Please login again."
        );
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            ApiError::Validation("Title is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::NotFound("User not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Forbidden("Not authorized to delete this food item").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Upload(UploadError::FileTooLarge).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upload_messages_are_enumerable() {
        assert_eq!(
            UploadError::FileTooLarge.to_string(),
            "File too large. Maximum size is 5MB."
        );
        assert_eq!(
            UploadError::TooManyFiles.to_string(),
            "Too many files. Maximum is 5 files."
        );
        assert_eq!(
            UploadError::UnexpectedField.to_string(),
            "Unexpected field name for file upload."
        );
        assert_eq!(
            UploadError::Other("stream ended".into()).to_string(),
            "File upload error: stream ended"
        );
    }
}
