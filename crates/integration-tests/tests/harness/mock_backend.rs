//! Mock Chat Completions backend for integration tests
//!
//! Serves `POST /v1/chat/completions` with canned replies and records the
//! last request it received.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{StreamExt, stream};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// How the mock answers completion requests
enum Behavior {
    /// Text reply, or a tool call when tools are declared
    Canned,
    /// Fixed status and body
    Reject { status: StatusCode, body: String },
    /// Fixed status whose body breaks off mid-read
    RejectUnreadable { status: StatusCode },
    /// 200 with a body that is not a completion
    Garbage,
    /// Streams one chunk, then drops the connection
    Truncated,
}

struct MockState {
    behavior: Behavior,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

/// Mock backend running on an ephemeral port
pub struct MockBackend {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Start a mock with canned replies
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Canned).await
    }

    /// Start a mock that answers every request with `status` and `body`
    pub async fn start_rejecting(status: StatusCode, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Reject {
            status,
            body: body.to_owned(),
        })
        .await
    }

    /// Start a mock that answers with `status` and a body that cannot be read
    pub async fn start_rejecting_unreadable(status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner(Behavior::RejectUnreadable { status }).await
    }

    /// Start a mock that returns a non-JSON 200 body
    pub async fn start_garbage() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Garbage).await
    }

    /// Start a mock whose streams break after the first chunk
    pub async fn start_truncated() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Truncated).await
    }

    async fn start_inner(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            last_request: Mutex::new(None),
            last_authorization: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for the bridge's backend configuration
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Body of the most recent completion request
    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// `Authorization` header of the most recent completion request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    *state.last_authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    *state.last_request.lock().unwrap() = Some(request.clone());

    let streaming = request["stream"].as_bool().unwrap_or(false);
    let has_tools = request.get("tools").is_some();
    let model = request["model"].as_str().unwrap_or("mock-model").to_owned();

    match &state.behavior {
        Behavior::Reject { status, body } => (*status, body.clone()).into_response(),
        Behavior::RejectUnreadable { status } => (*status, broken_body("{\"error\": ")).into_response(),
        Behavior::Garbage => (StatusCode::OK, "<html>upstream proxy page</html>").into_response(),
        Behavior::Truncated => truncated_stream(&model),
        Behavior::Canned if streaming => event_stream(&stream_chunks(&model, has_tools)),
        Behavior::Canned => Json(completion(&model, has_tools)).into_response(),
    }
}

fn completion(model: &str, has_tools: bool) -> Value {
    let (message, finish_reason) = if has_tools {
        (
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_test_123",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"location\":\"San Francisco\"}"}
                }]
            }),
            "tool_calls",
        )
    } else {
        (json!({"role": "assistant", "content": "hello"}), "stop")
    };

    json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{"index": 0, "message": message, "finish_reason": finish_reason}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn chunk(model: &str, delta: &Value, finish_reason: Option<&str>) -> Value {
    json!({
        "id": "chatcmpl-test-stream",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{"index": 0, "delta": delta, "finish_reason": finish_reason}]
    })
}

fn stream_chunks(model: &str, has_tools: bool) -> Vec<Value> {
    let mut chunks = if has_tools {
        vec![
            chunk(
                model,
                &json!({"role": "assistant", "tool_calls": [{
                    "index": 0,
                    "id": "call_test_stream",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": ""}
                }]}),
                None,
            ),
            chunk(model, &json!({"tool_calls": [{"index": 0, "function": {"arguments": "{\"location\":"}}]}), None),
            chunk(model, &json!({"tool_calls": [{"index": 0, "function": {"arguments": "\"Paris\"}"}}]}), None),
            chunk(model, &json!({}), Some("tool_calls")),
        ]
    } else {
        vec![
            chunk(model, &json!({"role": "assistant", "content": "Hel"}), None),
            chunk(model, &json!({"content": "lo"}), None),
            chunk(model, &json!({}), Some("stop")),
        ]
    };

    // Usage arrives on a trailing chunk with no choices
    chunks.push(json!({
        "id": "chatcmpl-test-stream",
        "object": "chat.completion.chunk",
        "model": model,
        "choices": [],
        "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
    }));

    chunks
}

fn event_stream(chunks: &[Value]) -> Response {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");

    ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
}

fn truncated_stream(model: &str) -> Response {
    let first = format!("data: {}\n\n", chunk(model, &json!({"content": "partial"}), None));

    ([(header::CONTENT_TYPE, "text/event-stream")], broken_body(&first)).into_response()
}

/// Body that sends `first`, then drops the connection
fn broken_body(first: &str) -> Body {
    let first = first.to_owned();

    // Give the first chunk time to reach the bridge before the connection drops
    let body = stream::once(async move { Ok::<_, std::io::Error>(first) }).chain(stream::once(async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "backend crashed"))
    }));

    Body::from_stream(body)
}
