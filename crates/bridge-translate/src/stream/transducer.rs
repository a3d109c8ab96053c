use std::collections::HashMap;

use bridge_core::ErrorBody;

use crate::ids;
use crate::protocol::Role;
use crate::protocol::anthropic::{
    AnthropicMessageDelta, AnthropicStreamContentBlock, AnthropicStreamDelta, AnthropicStreamEvent,
    AnthropicStreamMessage, AnthropicUsage, StopReason,
};
use crate::protocol::openai::{OpenAiStreamChunk, OpenAiStreamToolCall};

/// Model name reported before any chunk names one
const PLACEHOLDER_MODEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing emitted yet
    Init,
    /// `message_start` emitted
    Streaming,
    /// `message_stop` or `error` emitted
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
    Text { index: u32 },
    ToolUse { index: u32 },
}

impl OpenBlock {
    const fn index(self) -> u32 {
        match self {
            Self::Text { index } | Self::ToolUse { index } => index,
        }
    }
}

/// A backend tool call and the content block it was given
#[derive(Debug)]
struct ToolCallSlot {
    id: String,
    name: String,
    block_index: u32,
    /// Argument bytes that arrived after the block was closed
    dropped_bytes: usize,
}

/// Re-frames Chat Completions stream chunks as Messages stream events
///
/// One instance per stream. Feed it backend SSE lines with
/// [`push_line`](Self::push_line), then call [`finish`](Self::finish) when the
/// backend ends or [`abort`](Self::abort) when it fails. Every block that is
/// opened is closed before the stream terminates, and at most one block is
/// open at a time.
#[derive(Debug)]
pub struct StreamTransducer {
    phase: Phase,
    message_id: String,
    model: String,
    next_block_index: u32,
    open_block: Option<OpenBlock>,
    /// Keyed by the backend's tool call index, which is unrelated to block numbering
    tool_calls: HashMap<u32, ToolCallSlot>,
    usage: Option<AnthropicUsage>,
}

impl Default for StreamTransducer {
    fn default() -> Self {
        Self::new(PLACEHOLDER_MODEL)
    }
}

impl StreamTransducer {
    /// Create a transducer that reports `model` until the backend names one
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            phase: Phase::Init,
            message_id: ids::message_id(),
            model: model.into(),
            next_block_index: 0,
            open_block: None,
            tool_calls: HashMap::new(),
            usage: None,
        }
    }

    /// Generated id carried by `message_start`
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Whether the terminal event has been produced
    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    /// Process one backend SSE line
    ///
    /// Lines without a `data:` prefix, the `[DONE]` sentinel and payloads
    /// that are not chunk JSON produce nothing.
    pub fn push_line(&mut self, line: &str) -> Vec<AnthropicStreamEvent> {
        let Some(payload) = line.trim().strip_prefix("data:") else {
            return Vec::new();
        };

        let payload = payload.trim();
        if payload == "[DONE]" {
            return Vec::new();
        }

        match serde_json::from_str::<OpenAiStreamChunk>(payload) {
            Ok(chunk) => self.push_chunk(chunk),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed stream chunk");
                Vec::new()
            }
        }
    }

    /// Process one parsed backend chunk
    pub fn push_chunk(&mut self, chunk: OpenAiStreamChunk) -> Vec<AnthropicStreamEvent> {
        let mut events = Vec::new();

        if self.is_terminated() {
            return events;
        }

        if let Some(model) = chunk.model.filter(|model| !model.is_empty()) {
            self.model = model;
        }
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage.into());
        }

        self.ensure_started(&mut events);

        let Some(choice) = chunk.choices.and_then(|choices| choices.into_iter().next()) else {
            return events;
        };

        if let Some(text) = choice.delta.content.filter(|text| !text.is_empty()) {
            self.push_text(text, &mut events);
        }

        for call in choice.delta.tool_calls.into_iter().flatten() {
            self.push_tool_call(call, &mut events);
        }

        if let Some(reason) = choice.finish_reason.filter(|reason| !reason.is_empty()) {
            self.close(StopReason::from_finish_reason(Some(&reason)), &mut events);
        }

        events
    }

    /// Close the stream after the backend ended without a finish reason
    pub fn finish(&mut self) -> Vec<AnthropicStreamEvent> {
        let mut events = Vec::new();

        if self.is_terminated() {
            return events;
        }

        self.ensure_started(&mut events);
        self.close(StopReason::EndTurn, &mut events);
        events
    }

    /// Close the open block and report a backend failure as an `error` event
    pub fn abort(&mut self, message: &str) -> Vec<AnthropicStreamEvent> {
        let mut events = Vec::new();

        if self.is_terminated() {
            return events;
        }

        self.ensure_started(&mut events);
        self.close_open_block(&mut events);
        self.report_incomplete_tool_calls();
        events.push(AnthropicStreamEvent::Error {
            error: ErrorBody {
                error_type: "api_error".to_owned(),
                message: message.to_owned(),
            },
        });
        self.phase = Phase::Terminated;
        events
    }

    fn ensure_started(&mut self, events: &mut Vec<AnthropicStreamEvent>) {
        if self.phase != Phase::Init {
            return;
        }

        self.phase = Phase::Streaming;
        events.push(AnthropicStreamEvent::MessageStart {
            message: AnthropicStreamMessage {
                id: self.message_id.clone(),
                message_type: "message".to_owned(),
                role: Role::Assistant,
                content: Vec::new(),
                model: self.model.clone(),
                stop_reason: None,
                stop_sequence: None,
                usage: AnthropicUsage::default(),
            },
        });
    }

    fn push_text(&mut self, text: String, events: &mut Vec<AnthropicStreamEvent>) {
        let index = match self.open_block {
            Some(OpenBlock::Text { index }) => index,
            _ => {
                self.close_open_block(events);
                let index = self.allocate_block();
                self.open_block = Some(OpenBlock::Text { index });
                events.push(AnthropicStreamEvent::ContentBlockStart {
                    index,
                    content_block: AnthropicStreamContentBlock::Text { text: String::new() },
                });
                index
            }
        };

        events.push(AnthropicStreamEvent::ContentBlockDelta {
            index,
            delta: AnthropicStreamDelta::TextDelta { text },
        });
    }

    fn push_tool_call(&mut self, call: OpenAiStreamToolCall, events: &mut Vec<AnthropicStreamEvent>) {
        let (name, arguments) = call
            .function
            .map(|function| (function.name, function.arguments))
            .unwrap_or_default();

        if !self.tool_calls.contains_key(&call.index) {
            self.close_open_block(events);

            let index = self.allocate_block();
            let id = call.id.filter(|id| !id.is_empty()).unwrap_or_else(ids::tool_use_id);
            let name = name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("tool_{}", call.index));

            self.open_block = Some(OpenBlock::ToolUse { index });
            events.push(AnthropicStreamEvent::ContentBlockStart {
                index,
                content_block: AnthropicStreamContentBlock::ToolUse {
                    id: id.clone(),
                    name: name.clone(),
                    input: serde_json::Value::Object(serde_json::Map::new()),
                },
            });
            self.tool_calls.insert(
                call.index,
                ToolCallSlot {
                    id,
                    name,
                    block_index: index,
                    dropped_bytes: 0,
                },
            );
        }

        let Some(partial_json) = arguments.filter(|arguments| !arguments.is_empty()) else {
            return;
        };

        let Some(slot) = self.tool_calls.get_mut(&call.index) else {
            return;
        };

        if self.open_block != Some(OpenBlock::ToolUse { index: slot.block_index }) {
            slot.dropped_bytes += partial_json.len();
            tracing::warn!(
                upstream_index = call.index,
                tool_call_id = %slot.id,
                tool = %slot.name,
                "dropping arguments for a tool call whose block is already closed"
            );
            return;
        }

        events.push(AnthropicStreamEvent::ContentBlockDelta {
            index: slot.block_index,
            delta: AnthropicStreamDelta::InputJsonDelta { partial_json },
        });
    }

    fn allocate_block(&mut self) -> u32 {
        let index = self.next_block_index;
        self.next_block_index += 1;
        index
    }

    fn close_open_block(&mut self, events: &mut Vec<AnthropicStreamEvent>) {
        if let Some(block) = self.open_block.take() {
            events.push(AnthropicStreamEvent::ContentBlockStop { index: block.index() });
        }
    }

    /// Name every tool call whose input reached the client truncated
    fn incomplete_tool_calls(&self) -> impl Iterator<Item = &ToolCallSlot> {
        self.tool_calls.values().filter(|slot| slot.dropped_bytes > 0)
    }

    fn report_incomplete_tool_calls(&self) {
        for slot in self.incomplete_tool_calls() {
            tracing::warn!(
                tool_call_id = %slot.id,
                tool = %slot.name,
                dropped_bytes = slot.dropped_bytes,
                "tool call input sent to the client is incomplete"
            );
        }
    }

    fn close(&mut self, stop_reason: StopReason, events: &mut Vec<AnthropicStreamEvent>) {
        self.close_open_block(events);
        self.report_incomplete_tool_calls();
        events.push(AnthropicStreamEvent::MessageDelta {
            delta: AnthropicMessageDelta {
                stop_reason: Some(stop_reason),
                stop_sequence: None,
            },
            usage: self.usage.unwrap_or_default(),
        });
        events.push(AnthropicStreamEvent::MessageStop);
        self.phase = Phase::Terminated;
    }
}
