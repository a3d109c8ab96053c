//! Backend Chat Completions response -> Messages reply

use crate::error::TranslateError;
use crate::ids;
use crate::protocol::Role;
use crate::protocol::anthropic::{AnthropicResponse, AnthropicResponseBlock, AnthropicUsage, StopReason};
use crate::protocol::openai::{OpenAiResponse, OpenAiResponseToolCall, OpenAiUsage};

/// Parse a raw backend response body and convert it
pub fn translate_response(body: &[u8]) -> Result<AnthropicResponse, TranslateError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;

    if !value.is_object() {
        return Err(TranslateError::InvalidResponse("expected a JSON object".to_owned()));
    }

    let response: OpenAiResponse =
        serde_json::from_value(value).map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;

    Ok(response.into())
}

impl From<OpenAiResponse> for AnthropicResponse {
    fn from(resp: OpenAiResponse) -> Self {
        let choice = resp.choices.and_then(|choices| choices.into_iter().next()).unwrap_or_default();

        let mut content = Vec::new();

        if let Some(text) = choice.message.content.filter(|text| !text.is_empty()) {
            content.push(AnthropicResponseBlock::Text { text });
        }

        content.extend(choice.message.tool_calls.into_iter().flatten().map(tool_use_block));

        // Messages replies never carry an empty content list
        if content.is_empty() {
            content.push(AnthropicResponseBlock::Text { text: String::new() });
        }

        Self {
            id: resp.id.unwrap_or_else(ids::message_id),
            response_type: "message".to_owned(),
            role: Role::Assistant,
            model: resp.model.unwrap_or_else(|| "unknown".to_owned()),
            content,
            stop_reason: Some(StopReason::from_finish_reason(choice.finish_reason.as_deref())),
            stop_sequence: None,
            usage: resp.usage.map(Into::into).unwrap_or_default(),
        }
    }
}

fn tool_use_block(call: OpenAiResponseToolCall) -> AnthropicResponseBlock {
    let arguments = call.function.arguments;
    let input = serde_json::from_str(&arguments).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "tool call arguments are not valid JSON, wrapping raw string");
        serde_json::json!({ "text": arguments })
    });

    AnthropicResponseBlock::ToolUse {
        id: call.id.unwrap_or_else(ids::tool_use_id),
        name: call.function.name,
        input,
    }
}

impl From<OpenAiUsage> for AnthropicUsage {
    fn from(usage: OpenAiUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            cache_read_input_tokens: 0,
            cache_creation_input_tokens: 0,
        }
    }
}
