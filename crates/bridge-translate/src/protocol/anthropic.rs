//! Messages API wire format, as received from callers and sent back

use bridge_core::ErrorBody;
use serde::{Deserialize, Serialize};

use super::Role;

// -- Request types --

/// Body of `POST /v1/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicRequest {
    /// Requested model; "default" when absent
    #[serde(default = "default_model")]
    pub model: String,
    /// Output token cap; 4096 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Top-level system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<AnthropicSystem>,
    /// Conversation history
    pub messages: Vec<AnthropicMessage>,
    /// Temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Forwarded as `stop`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Reply as an SSE stream
    #[serde(default)]
    pub stream: bool,
    /// Declared tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AnthropicTool>>,
    /// Tool selection policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<AnthropicToolChoice>,
}

fn default_model() -> String {
    "default".to_owned()
}

/// System prompt: plain text or a list of labeled segments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnthropicSystem {
    /// Plain text
    Text(String),
    /// Segments; only `text` segments carry prompt text
    Segments(Vec<AnthropicSystemSegment>),
}

/// One segment of a structured system prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicSystemSegment {
    /// Segment type (e.g. "text")
    #[serde(rename = "type")]
    pub segment_type: String,
    /// Segment text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Anthropic message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Author role
    pub role: Role,
    /// Content blocks
    pub content: AnthropicContent,
}

/// Message body: shorthand string or list of blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnthropicContent {
    /// Single text body
    Text(String),
    /// Typed blocks
    Blocks(Vec<AnthropicContentBlock>),
}

/// Block of a request message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Text content
    Text {
        /// The text string
        text: String,
    },
    /// Earlier tool call by the assistant
    ToolUse {
        /// Call id
        id: String,
        /// Tool to call
        name: String,
        /// Call arguments
        #[serde(default = "empty_object")]
        input: serde_json::Value,
    },
    /// Output of a tool call, sent by the user
    ToolResult {
        /// Call this result answers
        tool_use_id: String,
        /// Result payload: a string, a list of blocks, or any JSON
        #[serde(default)]
        content: serde_json::Value,
    },
    /// Block types neither side can carry (images, thinking, …)
    #[serde(other)]
    Unsupported,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Declared tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicTool {
    /// Tool kind; absent or "custom" for client tools, versioned names for
    /// server-side builtins (e.g. `web_search_20250305`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    /// Tool to call
    pub name: String,
    /// Description shown to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input JSON Schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

impl AnthropicTool {
    /// Whether this is a client-defined function tool
    pub fn is_function(&self) -> bool {
        self.tool_type.as_deref().is_none_or(|kind| kind == "custom")
    }
}

/// Anthropic tool choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicToolChoice {
    /// Choice type: "auto", "any", "none", or "tool"
    #[serde(rename = "type")]
    pub choice_type: String,
    /// Required when type is "tool"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// -- Response types --

/// Non-streaming reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicResponse {
    /// Response identifier
    pub id: String,
    /// Always "message"
    #[serde(rename = "type")]
    pub response_type: String,
    /// Always assistant
    pub role: Role,
    /// Model used
    pub model: String,
    /// Response content blocks, never empty
    pub content: Vec<AnthropicResponseBlock>,
    /// Stop reason
    pub stop_reason: Option<StopReason>,
    /// Always null; the backend does not report it
    pub stop_sequence: Option<String>,
    /// Token usage
    pub usage: AnthropicUsage,
}

/// Block of a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicResponseBlock {
    /// Text response
    Text {
        /// The text string
        text: String,
    },
    /// Tool use request
    ToolUse {
        /// Call id
        id: String,
        /// Tool to call
        name: String,
        /// Call arguments
        input: serde_json::Value,
    },
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of the turn
    EndTurn,
    /// Output token limit reached
    MaxTokens,
    /// Model requested a tool
    ToolUse,
    /// Generation halted by a stop sequence or filter
    StopSequence,
}

impl StopReason {
    /// Map a Chat Completions `finish_reason`; unknown or absent reasons end the turn
    pub fn from_finish_reason(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => Self::MaxTokens,
            Some("tool_calls") => Self::ToolUse,
            Some("content_filter") => Self::StopSequence,
            _ => Self::EndTurn,
        }
    }
}

/// Anthropic token usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicUsage {
    /// Input tokens
    pub input_tokens: u32,
    /// Output tokens
    pub output_tokens: u32,
    /// Prompt cache reads (never reported by the backend)
    #[serde(default)]
    pub cache_read_input_tokens: u32,
    /// Prompt cache writes (never reported by the backend)
    #[serde(default)]
    pub cache_creation_input_tokens: u32,
}

// -- Streaming types --

/// Event of a streamed reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamEvent {
    /// Stream started
    MessageStart {
        /// Reply shell with id and model
        message: AnthropicStreamMessage,
    },
    /// Block opened
    ContentBlockStart {
        /// Block index
        index: u32,
        /// Initial block content
        content_block: AnthropicStreamContentBlock,
    },
    /// Fragment for the open block
    ContentBlockDelta {
        /// Block index
        index: u32,
        /// Delta content
        delta: AnthropicStreamDelta,
    },
    /// Block closed
    ContentBlockStop {
        /// Block index
        index: u32,
    },
    /// Final stop reason and usage
    MessageDelta {
        /// Stop fields
        delta: AnthropicMessageDelta,
        /// Final usage
        usage: AnthropicUsage,
    },
    /// Stream completed
    MessageStop,
    /// Stream failed after it started
    Error {
        /// Error details
        error: ErrorBody,
    },
}

impl AnthropicStreamEvent {
    /// SSE `event:` name for this event
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::MessageStart { .. } => "message_start",
            Self::ContentBlockStart { .. } => "content_block_start",
            Self::ContentBlockDelta { .. } => "content_block_delta",
            Self::ContentBlockStop { .. } => "content_block_stop",
            Self::MessageDelta { .. } => "message_delta",
            Self::MessageStop => "message_stop",
            Self::Error { .. } => "error",
        }
    }

    /// JSON payload for the SSE `data:` line
    pub fn data(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Full SSE frame: `event:` line, `data:` line, blank line
    pub fn to_sse_frame(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event_name(), self.data())
    }
}

/// Payload of `message_start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicStreamMessage {
    /// Response identifier
    pub id: String,
    /// Object type
    #[serde(rename = "type")]
    pub message_type: String,
    /// Role
    pub role: Role,
    /// Always empty at stream start
    pub content: Vec<AnthropicResponseBlock>,
    /// Model
    pub model: String,
    /// Always null at stream start
    pub stop_reason: Option<StopReason>,
    /// Always null at stream start
    pub stop_sequence: Option<String>,
    /// Initial usage
    pub usage: AnthropicUsage,
}

/// Payload of `content_block_start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamContentBlock {
    /// Text block
    Text {
        /// Initial text (always empty)
        text: String,
    },
    /// Tool use block
    ToolUse {
        /// Tool use ID
        id: String,
        /// Tool to call
        name: String,
        /// Initial input (always an empty object)
        input: serde_json::Value,
    },
}

/// Payload of `content_block_delta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamDelta {
    /// Incremental text
    TextDelta {
        /// Text fragment
        text: String,
    },
    /// Raw piece of tool input JSON
    InputJsonDelta {
        /// JSON fragment
        partial_json: String,
    },
}

/// Stop fields of `message_delta`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessageDelta {
    /// Stop reason
    pub stop_reason: Option<StopReason>,
    /// Stop sequence
    pub stop_sequence: Option<String>,
}
