//! Inbound Messages request -> backend Chat Completions request

use crate::error::TranslateError;
use crate::protocol::Role;
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicSystem, AnthropicTool,
    AnthropicToolChoice,
};
use crate::protocol::openai::{
    OpenAiFunction, OpenAiFunctionCall, OpenAiFunctionName, OpenAiMessage, OpenAiNamedToolChoice, OpenAiRequest,
    OpenAiStreamOptions, OpenAiTool, OpenAiToolCall, OpenAiToolChoice, OpenAiToolChoiceMode,
};

/// Default max tokens when the caller leaves it out
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Parse a raw Messages request body and convert it
pub fn translate_request(body: &[u8]) -> Result<OpenAiRequest, TranslateError> {
    let request: AnthropicRequest =
        serde_json::from_slice(body).map_err(|e| TranslateError::InvalidRequest(e.to_string()))?;

    OpenAiRequest::try_from(request)
}

impl TryFrom<AnthropicRequest> for OpenAiRequest {
    type Error = TranslateError;

    fn try_from(req: AnthropicRequest) -> Result<Self, Self::Error> {
        let mut messages = Vec::with_capacity(req.messages.len() + 1);

        if let Some(system) = req.system.map(flatten_system).filter(|text| !text.is_empty()) {
            messages.push(OpenAiMessage::text(Role::System, system));
        }

        for msg in req.messages {
            push_message(&mut messages, msg);
        }

        let tools = req
            .tools
            .map(|tools| tools.into_iter().filter(AnthropicTool::is_function).map(Into::into).collect::<Vec<_>>())
            .filter(|tools| !tools.is_empty());

        let tool_choice = match req.tool_choice {
            Some(choice) => convert_tool_choice(choice)?,
            None => None,
        };

        Ok(Self {
            model: req.model,
            messages,
            max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            stream: req.stream,
            temperature: req.temperature,
            top_p: req.top_p,
            stop: req.stop_sequences,
            tools,
            tool_choice,
            stream_options: req.stream.then_some(OpenAiStreamOptions { include_usage: true }),
        })
    }
}

/// Join the text segments of a system prompt
fn flatten_system(system: AnthropicSystem) -> String {
    match system {
        AnthropicSystem::Text(text) => text,
        AnthropicSystem::Segments(segments) => segments
            .into_iter()
            .filter(|segment| segment.segment_type == "text")
            .filter_map(|segment| segment.text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Append the Chat Completions messages produced by one history message
fn push_message(out: &mut Vec<OpenAiMessage>, msg: AnthropicMessage) {
    let blocks = match msg.content {
        AnthropicContent::Text(text) => {
            out.push(OpenAiMessage::text(msg.role, text));
            return;
        }
        AnthropicContent::Blocks(blocks) => blocks,
    };

    match msg.role {
        Role::User => push_user_blocks(out, blocks),
        Role::Assistant => out.push(assistant_message(blocks)),
        Role::System | Role::Tool => {
            tracing::debug!(role = ?msg.role, "ignoring block content on non-conversational role");
        }
    }
}

/// Tool results become standalone tool messages ahead of the joined user text
fn push_user_blocks(out: &mut Vec<OpenAiMessage>, blocks: Vec<AnthropicContentBlock>) {
    let mut texts = Vec::new();

    for block in blocks {
        match block {
            AnthropicContentBlock::Text { text } if !text.is_empty() => texts.push(text),
            AnthropicContentBlock::ToolResult { tool_use_id, content } => {
                out.push(OpenAiMessage::tool_result(tool_use_id, tool_result_text(content)));
            }
            _ => {}
        }
    }

    if !texts.is_empty() {
        out.push(OpenAiMessage::text(Role::User, texts.join("\n")));
    }
}

fn tool_result_text(content: serde_json::Value) -> String {
    match content {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn assistant_message(blocks: Vec<AnthropicContentBlock>) -> OpenAiMessage {
    let mut texts = Vec::new();
    let mut tool_calls = Vec::new();

    for block in blocks {
        match block {
            AnthropicContentBlock::Text { text } if !text.is_empty() => texts.push(text),
            AnthropicContentBlock::ToolUse { id, name, input } => tool_calls.push(OpenAiToolCall {
                id,
                tool_type: "function".to_owned(),
                function: OpenAiFunctionCall {
                    name,
                    arguments: input.to_string(),
                },
            }),
            _ => {}
        }
    }

    OpenAiMessage {
        role: Role::Assistant,
        content: texts.join("\n"),
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        tool_call_id: None,
    }
}

impl From<AnthropicTool> for OpenAiTool {
    fn from(tool: AnthropicTool) -> Self {
        Self {
            tool_type: "function".to_owned(),
            function: OpenAiFunction {
                name: tool.name,
                description: tool.description.unwrap_or_default(),
                parameters: tool
                    .input_schema
                    .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
            },
        }
    }
}

fn convert_tool_choice(choice: AnthropicToolChoice) -> Result<Option<OpenAiToolChoice>, TranslateError> {
    let mapped = match choice.choice_type.as_str() {
        "auto" => OpenAiToolChoice::Mode(OpenAiToolChoiceMode::Auto),
        "none" => OpenAiToolChoice::Mode(OpenAiToolChoiceMode::None),
        "any" => OpenAiToolChoice::Mode(OpenAiToolChoiceMode::Required),
        "tool" => {
            let name = choice
                .name
                .ok_or_else(|| TranslateError::InvalidRequest("tool_choice of type \"tool\" requires a name".to_owned()))?;
            OpenAiToolChoice::Function(OpenAiNamedToolChoice {
                tool_type: "function".to_owned(),
                function: OpenAiFunctionName { name },
            })
        }
        other => {
            tracing::debug!(choice_type = other, "dropping unrecognized tool_choice");
            return Ok(None);
        }
    };

    Ok(Some(mapped))
}
