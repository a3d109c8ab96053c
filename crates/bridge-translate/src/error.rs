use bridge_core::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Errors raised while converting documents between the two formats
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Inbound Messages request is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Backend reply is not a Chat Completions document
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

impl HttpError for TranslateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::InvalidResponse(_) => "api_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
