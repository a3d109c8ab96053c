//! Streaming reply translation
//!
//! The backend byte stream is pulled through [`frame_lines`] and
//! [`StreamTransducer`] only as fast as the caller polls the resulting event
//! stream. Dropping the event stream drops the backend source with it.

mod framer;
mod transducer;

use std::collections::VecDeque;
use std::fmt::Display;

use futures_util::{Stream, StreamExt, stream};

pub use framer::{LineFramer, frame_lines};
pub use transducer::StreamTransducer;

use crate::protocol::anthropic::AnthropicStreamEvent;

struct TransduceState<S> {
    lines: Option<S>,
    transducer: StreamTransducer,
    pending: VecDeque<AnthropicStreamEvent>,
}

/// Drive a transducer from a fallible stream of backend SSE lines
///
/// The line source is released as soon as the transducer terminates, even if
/// the backend has more to send. A source error becomes a terminal `error`
/// event.
pub fn transduce<S, E>(lines: S, transducer: StreamTransducer) -> impl Stream<Item = AnthropicStreamEvent>
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: Display,
{
    let state = TransduceState {
        lines: Some(lines),
        transducer,
        pending: VecDeque::new(),
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((event, state));
            }

            let lines = state.lines.as_mut()?;
            let events = match lines.next().await {
                Some(Ok(line)) => state.transducer.push_line(&line),
                Some(Err(e)) => {
                    tracing::error!(error = %e, "backend stream failed");
                    state.transducer.abort(&format!("Backend stream error: {e}"))
                }
                None => state.transducer.finish(),
            };

            state.pending.extend(events);
            if state.transducer.is_terminated() {
                state.lines = None;
            }
        }
    })
}

/// Translate a backend Chat Completions byte stream into Messages events
///
/// `model` is reported in `message_start` when the first backend chunk does
/// not name one.
pub fn anthropic_event_stream<S, B, E>(bytes: S, model: impl Into<String>) -> impl Stream<Item = AnthropicStreamEvent>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    transduce(Box::pin(frame_lines(bytes)), StreamTransducer::new(model))
}
