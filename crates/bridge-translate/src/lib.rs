//! Translation between the Anthropic Messages API and the `OpenAI` Chat
//! Completions API
//!
//! Requests flow Messages → Chat Completions, replies flow back. Streaming
//! replies are re-framed from Chat Completions deltas into Messages content
//! blocks by [`StreamTransducer`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod ids;
pub mod protocol;
pub mod stream;

pub use convert::request::translate_request;
pub use convert::response::translate_response;
pub use error::TranslateError;
pub use protocol::anthropic::{AnthropicRequest, AnthropicResponse, AnthropicStreamEvent, StopReason};
pub use protocol::openai::{OpenAiRequest, OpenAiResponse, OpenAiStreamChunk};
pub use stream::{LineFramer, StreamTransducer, anthropic_event_stream, frame_lines, transduce};
