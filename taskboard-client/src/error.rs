/// Client error types
///
/// Server failures keep the server's `message` so pages can show it as-is.

use reqwest::StatusCode;
use serde::Deserialize;

/// One field-level validation failure reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error body returned by the API (`{ error, message, details? }`)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub details: Vec<FieldError>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
        details: Vec<FieldError>,
    },

    /// Transport failure (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A form could not be turned into a request
    #[error("{0}")]
    Input(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Text to show the user
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Api { status, .. } => format!("Request failed with status {}", status),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Field-level details of a 422, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ClientError::Api { details, .. } => details,
            _ => &[],
        }
    }

    pub(crate) fn from_body(status: StatusCode, bytes: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(body) => ClientError::Api {
                status,
                code: body.error,
                message: body.message,
                details: body.details,
            },
            Err(_) => ClientError::Api {
                status,
                code: String::new(),
                message: String::from_utf8_lossy(bytes).trim().to_string(),
                details: Vec::new(),
            },
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
