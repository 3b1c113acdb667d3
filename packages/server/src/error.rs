use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `USERNAME_TAKEN`, `STORAGE_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name must be 1-128 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    UsernameTaken,
    /// Blob store I/O failure.
    Storage(String),
    /// Database failure while reading or writing an entity.
    Persistence(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TokenMissing | AppError::TokenInvalid | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::Storage(_) | AppError::Persistence(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn into_body(self) -> ErrorBody {
        match self {
            AppError::Validation(msg) => ErrorBody {
                code: "VALIDATION_ERROR",
                message: msg,
            },
            AppError::TokenMissing => ErrorBody {
                code: "TOKEN_MISSING",
                message: "Authentication required".into(),
            },
            AppError::TokenInvalid => ErrorBody {
                code: "TOKEN_INVALID",
                message: "Invalid or expired token".into(),
            },
            AppError::InvalidCredentials => ErrorBody {
                code: "INVALID_CREDENTIALS",
                message: "Invalid username or password".into(),
            },
            AppError::PermissionDenied => ErrorBody {
                code: "PERMISSION_DENIED",
                message: "Insufficient permissions".into(),
            },
            AppError::NotFound(msg) => ErrorBody {
                code: "NOT_FOUND",
                message: msg,
            },
            AppError::UsernameTaken => ErrorBody {
                code: "USERNAME_TAKEN",
                message: "Username is already taken".into(),
            },
            AppError::Storage(detail) => {
                tracing::error!("Storage error: {}", detail);
                ErrorBody {
                    code: "STORAGE_ERROR",
                    message: "Failed to access image storage".into(),
                }
            }
            AppError::Persistence(detail) => {
                tracing::error!("Persistence error: {}", detail);
                ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "An unexpected error occurred".into(),
                }
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "An unexpected error occurred".into(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => {
                AppError::NotFound("Image not found".into())
            }
            StorageError::Io(e) => AppError::Storage(e.to_string()),
            rejected => AppError::Validation(rejected.to_string()),
        }
    }
}
