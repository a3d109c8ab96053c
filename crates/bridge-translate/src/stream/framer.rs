use std::collections::VecDeque;

use futures_util::{Stream, StreamExt, stream};

/// Splits a byte stream into text lines on `\n`
///
/// Bytes are held until their line is complete, so multi-byte characters cut
/// across reads decode correctly. Invalid UTF-8 is replaced, never rejected.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a read and take every line it completes
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        // The held bytes never contain a newline, so only the new read is scanned
        let held = self.buffer.len();
        self.buffer.extend_from_slice(bytes);

        let Some(last_newline) = bytes.iter().rposition(|&b| b == b'\n').map(|pos| held + pos) else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete[..last_newline]
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Take the unterminated remainder at end of input, if any
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }

        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

struct FrameState<S> {
    source: Option<S>,
    framer: LineFramer,
    pending: VecDeque<String>,
}

/// Lazily turn a fallible byte stream into a stream of lines
///
/// A source error is yielded once and ends the stream. The source is dropped
/// as soon as it is exhausted or fails.
pub fn frame_lines<S, B, E>(source: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let state = FrameState {
        source: Some(source),
        framer: LineFramer::new(),
        pending: VecDeque::new(),
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = state.pending.pop_front() {
                return Some((Ok(line), state));
            }

            let source = state.source.as_mut()?;
            match source.next().await {
                Some(Ok(bytes)) => state.pending.extend(state.framer.push(bytes.as_ref())),
                Some(Err(e)) => {
                    state.source = None;
                    return Some((Err(e), state));
                }
                None => {
                    state.source = None;
                    let rest = state.framer.finish()?;
                    return Some((Ok(rest), state));
                }
            }
        }
    })
}
