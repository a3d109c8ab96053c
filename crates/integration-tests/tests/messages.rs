mod harness;

use harness::config::ConfigBuilder;
use harness::mock_backend::MockBackend;
use harness::server::TestServer;
use serde_json::json;

#[tokio::test]
async fn plain_text_turn() {
    let mock = MockBackend::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build()).await.unwrap();

    let resp = server
        .post_messages(&json!({"messages": [{"role": "user", "content": "hi"}], "stream": false}))
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();

    assert_eq!(body["type"], "message");
    assert_eq!(body["role"], "assistant");
    assert_eq!(body["content"], json!([{"type": "text", "text": "hello"}]));
    assert_eq!(body["stop_reason"], "end_turn");
    assert_eq!(body["stop_sequence"], serde_json::Value::Null);
    assert_eq!(
        body["usage"],
        json!({
            "input_tokens": 10,
            "output_tokens": 5,
            "cache_read_input_tokens": 0,
            "cache_creation_input_tokens": 0
        })
    );

    let forwarded = mock.last_request().unwrap();
    assert_eq!(forwarded["model"], "default");
    assert_eq!(forwarded["max_tokens"], 4096);
    assert_eq!(forwarded["stream"], false);
    assert_eq!(forwarded["messages"], json!([{"role": "user", "content": "hi"}]));
    assert!(forwarded.get("stream_options").is_none());
}

#[tokio::test]
async fn tool_use_reply() {
    let mock = MockBackend::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build()).await.unwrap();

    let resp = server
        .post_messages(&json!({
            "model": "claude-sonnet",
            "max_tokens": 256,
            "messages": [{"role": "user", "content": "What is the weather?"}],
            "tools": [
                {
                    "name": "get_weather",
                    "description": "Get current weather",
                    "input_schema": {"type": "object", "properties": {"location": {"type": "string"}}}
                },
                {"type": "web_search_20250305", "name": "web_search"}
            ],
            "tool_choice": {"type": "any"}
        }))
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();

    assert_eq!(
        body["content"],
        json!([{
            "type": "tool_use",
            "id": "call_test_123",
            "name": "get_weather",
            "input": {"location": "San Francisco"}
        }])
    );
    assert_eq!(body["stop_reason"], "tool_use");

    let forwarded = mock.last_request().unwrap();
    assert_eq!(forwarded["tool_choice"], "required");
    assert_eq!(
        forwarded["tools"],
        json!([{
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Get current weather",
                "parameters": {"type": "object", "properties": {"location": {"type": "string"}}}
            }
        }])
    );
}

#[tokio::test]
async fn conversation_history_is_translated() {
    let mock = MockBackend::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build()).await.unwrap();

    let resp = server
        .post_messages(&json!({
            "system": [{"type": "text", "text": "Be brief."}],
            "messages": [
                {"role": "user", "content": "Weather in Paris?"},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Checking."},
                    {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"location": "Paris"}}
                ]},
                {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "toolu_1", "content": "18C"},
                    {"type": "text", "text": "Thanks"}
                ]}
            ]
        }))
        .await;

    assert_eq!(resp.status(), 200);

    let forwarded = mock.last_request().unwrap();
    assert_eq!(
        forwarded["messages"],
        json!([
            {"role": "system", "content": "Be brief."},
            {"role": "user", "content": "Weather in Paris?"},
            {"role": "assistant", "content": "Checking.", "tool_calls": [{
                "id": "toolu_1",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"location\":\"Paris\"}"}
            }]},
            {"role": "tool", "content": "18C", "tool_call_id": "toolu_1"},
            {"role": "user", "content": "Thanks"}
        ])
    );
}

#[tokio::test]
async fn backend_settings_are_applied() {
    let mock = MockBackend::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url())
        .with_api_key("sk-test")
        .with_model_override("llama-3-8b")
        .build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .post_messages(&json!({"model": "claude-opus", "messages": [{"role": "user", "content": "hi"}]}))
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["model"], "llama-3-8b");

    assert_eq!(mock.last_authorization().as_deref(), Some("Bearer sk-test"));
    assert_eq!(mock.last_request().unwrap()["model"], "llama-3-8b");
}
