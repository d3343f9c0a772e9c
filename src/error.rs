use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::StoreError;

/// Errors returned by HTTP handlers, rendered as JSON `ErrorResponse` bodies
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn label(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::BAD_REQUEST => "validation_failed",
            StatusCode::CONFLICT => "conflict",
            _ => "internal_error",
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) | ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Store(StoreError::SqlxError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::Store(StoreError::SqlxError(e)) => {
                tracing::error!("Database error: {}", e);
                "Database request failed".to_string()
            }
            ApiError::Store(StoreError::NotFound(_)) => "Not found".to_string(),
            ApiError::Store(StoreError::Conflict(reason)) => reason.clone(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid query: {}", err)).into()
}

/// Handle path segment errors (e.g. malformed ids)
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid path: {}", err)).into()
}
