//! Axum route handlers

use std::convert::Infallible;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use bridge_translate::{anthropic_event_stream, translate_request, translate_response};
use futures_util::StreamExt;

use crate::backend::BackendClient;
use crate::error::ProxyError;

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Fallback for unknown routes
pub async fn not_found() -> ProxyError {
    ProxyError::NotFound
}

/// Handle `POST /v1/messages`
///
/// The body is taken raw so that malformed documents are reported in the
/// Messages error envelope rather than axum's plain-text rejection.
pub async fn messages(State(backend): State<BackendClient>, body: Bytes) -> Result<Response, ProxyError> {
    let request = translate_request(&body)?;
    let inbound_model = request.model.clone();
    let stream = request.stream;

    tracing::debug!(model = %inbound_model, stream, messages = request.messages.len(), "forwarding request");

    let response = backend.send(request).await?;

    if stream {
        let events = anthropic_event_stream(Box::pin(response.bytes_stream()), inbound_model)
            .map(|event| Ok::<_, Infallible>(Event::default().event(event.event_name()).data(event.data())));

        return Ok(Sse::new(events).into_response());
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ProxyError::BackendUnreachable(e.to_string()))?;

    Ok(Json(translate_response(&body)?).into_response())
}
