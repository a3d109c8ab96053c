use axum::Json;
use axum::response::{IntoResponse, Response};
use bridge_core::HttpError;
use bridge_translate::TranslateError;
use http::StatusCode;
use thiserror::Error;

/// Errors surfaced by the `/v1/messages` handler
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Inbound request or backend reply could not be converted
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Transport failure talking to the backend
    #[error("Backend error: {0}")]
    BackendUnreachable(String),

    /// Backend answered with a non-success status
    #[error("backend returned {status}")]
    BackendRejected {
        /// Backend status, passed through
        status: StatusCode,
        /// Backend body, passed through as the message
        body: String,
    },

    /// No route matches the request
    #[error("Not found")]
    NotFound,
}

impl HttpError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Translate(e) => e.status_code(),
            Self::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::BackendRejected { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Translate(e) => e.error_type(),
            Self::BackendUnreachable(_) | Self::BackendRejected { .. } => "api_error",
            Self::NotFound => "not_found_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::BackendRejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.envelope())).into_response()
    }
}
