// Common DTOs for public API
//
// These types are shared across the registry endpoints.

use axum::http::StatusCode;
use axum::Json;
use llmhub_core::RegistryError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a registry error to an HTTP error.
/// Storage and encryption details are logged, never returned.
pub fn registry_error(action: &str, e: RegistryError) -> ApiError {
    match e {
        RegistryError::NotAllowed => {
            ErrorResponse::new(e.to_string()).into_response(StatusCode::FORBIDDEN)
        }
        other => {
            tracing::error!("Failed to {}: {}", action, other);
            ErrorResponse::new("Internal server error")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
