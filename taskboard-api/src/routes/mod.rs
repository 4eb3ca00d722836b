/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout and the caller's own resources
/// - `projects`: Project CRUD
/// - `tasks`: Task CRUD and filtered listing
///
/// Successful responses share the [`Envelope`] shape `{ data?, message? }`.

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Success response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Payload only
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    /// Payload with a confirmation message
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl Envelope<()> {
    /// Confirmation message without payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Wraps a newly created entity in a 201 response
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Envelope<T>) {
    (StatusCode::CREATED, Envelope::with_message(message, data))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
