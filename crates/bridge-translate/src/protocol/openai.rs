//! Chat Completions wire format, as sent to and read from the backend

use serde::{Deserialize, Serialize};

use super::Role;

// -- Request types --

/// Body posted to `/v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiRequest {
    /// Model name
    pub model: String,
    /// Conversation so far
    pub messages: Vec<OpenAiMessage>,
    /// Output token cap
    pub max_tokens: u32,
    /// Ask for an SSE reply
    pub stream: bool,
    /// Temperature, when the caller set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Extra stop strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Declared tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiTool>>,
    /// Tool selection policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<OpenAiToolChoice>,
    /// Sent only for streaming requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<OpenAiStreamOptions>,
}

/// Extra knobs for streamed replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiStreamOptions {
    /// Report token counts on the final chunk
    pub include_usage: bool,
}

/// `OpenAI` message within a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiMessage {
    /// Author
    pub role: Role,
    /// Message text
    pub content: String,
    /// Calls requested in an assistant turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
    /// Call answered by a tool message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl OpenAiMessage {
    /// Plain text message
    pub const fn text(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Tool result message answering `tool_call_id`
    pub const fn tool_result(tool_call_id: String, content: String) -> Self {
        Self {
            role: Role::Tool,
            content,
            tool_calls: None,
            tool_call_id: Some(tool_call_id),
        }
    }
}

/// Declared function tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiTool {
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Name, description and schema
    pub function: OpenAiFunction,
}

/// Function tool signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiFunction {
    /// Function name
    pub name: String,
    /// Shown to the model; empty when the caller gave none
    pub description: String,
    /// Argument JSON Schema
    pub parameters: serde_json::Value,
}

/// `OpenAI` tool call within an assistant message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiToolCall {
    /// Call id, echoed back by the tool message
    pub id: String,
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function call details
    pub function: OpenAiFunctionCall,
}

/// Function name and serialized arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiFunctionCall {
    /// Function name
    pub name: String,
    /// Arguments as a JSON string
    pub arguments: String,
}

/// `OpenAI` tool choice: a mode string or a forced function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenAiToolChoice {
    /// "none", "auto", or "required"
    Mode(OpenAiToolChoiceMode),
    /// Must call this function
    Function(OpenAiNamedToolChoice),
}

/// Tool selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAiToolChoiceMode {
    /// No tool calls
    None,
    /// Model's choice
    Auto,
    /// At least one tool call
    Required,
}

/// Forced function selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiNamedToolChoice {
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function to call
    pub function: OpenAiFunctionName,
}

/// Name of the forced function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiFunctionName {
    /// Function name
    pub name: String,
}

// -- Response types --
//
// Backends differ in which fields they fill in, so everything the
// translation can live without is optional.

/// Non-streaming reply from the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Generated choices
    #[serde(default)]
    pub choices: Option<Vec<OpenAiChoice>>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

/// One candidate; only the first is used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiChoice {
    /// Generated message
    #[serde(default)]
    pub message: OpenAiChoiceMessage,
    /// `stop`, `length`, `tool_calls`, `content_filter`, …
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant output of a choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiChoiceMessage {
    /// Message text
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiResponseToolCall>>,
}

/// Tool call in a response; the id may be missing on some backends
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiResponseToolCall {
    /// Tool call identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Function call details
    #[serde(default)]
    pub function: OpenAiResponseFunctionCall,
}

/// Function call details in a response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiResponseFunctionCall {
    /// Function name
    #[serde(default)]
    pub name: String,
    /// JSON-encoded arguments, possibly invalid
    #[serde(default)]
    pub arguments: String,
}

/// Token usage in an `OpenAI` response or stream chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Completion tokens
    #[serde(default)]
    pub completion_tokens: u32,
}

// -- Streaming types --

/// One `data:` payload of a streamed reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiStreamChunk {
    /// Model used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Delta choices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<OpenAiStreamChoice>>,
    /// Usage (present on the final chunks when `stream_options.include_usage` is true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<OpenAiUsage>,
}

/// Per-choice delta of a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiStreamChoice {
    /// Incremental delta
    #[serde(default)]
    pub delta: OpenAiStreamDelta,
    /// Set on the last content chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// What a chunk adds to the reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiStreamDelta {
    /// Text fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool call fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAiStreamToolCall>>,
}

/// Fragment of one tool call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiStreamToolCall {
    /// Backend's index for this call; independent of content block numbering
    #[serde(default)]
    pub index: u32,
    /// Only on the call's first fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Partial function call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<OpenAiStreamFunctionCall>,
}

/// Function part of a tool call fragment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiStreamFunctionCall {
    /// Only on the call's first fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Piece of the arguments JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}
