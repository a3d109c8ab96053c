use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// converts these into actual HTTP responses, keeping domain errors
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Render the error in the Messages API envelope
    fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.error_type(), self.client_message())
    }
}

/// Messages API error body: `{"type": "error", "error": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `"error"`
    #[serde(rename = "type")]
    pub envelope_type: String,
    /// Error details
    pub error: ErrorBody,
}

/// Kind tag and human-readable message of an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind (e.g. `api_error`)
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
}

impl ErrorEnvelope {
    /// Build an envelope from a kind tag and a message
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            envelope_type: "error".to_owned(),
            error: ErrorBody {
                error_type: error_type.into(),
                message: message.into(),
            },
        }
    }
}
