#![allow(dead_code)]

pub mod config;
pub mod mock_backend;
pub mod server;

use serde_json::Value;

/// One parsed SSE event from the bridge
#[derive(Debug)]
pub struct SseEvent {
    pub name: String,
    pub data: Value,
}

/// Split a complete SSE body into `event:`/`data:` pairs
pub fn parse_sse(text: &str) -> Vec<SseEvent> {
    text.split("\n\n")
        .filter_map(|frame| {
            let mut name = None;
            let mut data = None;
            for line in frame.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    name = Some(value.trim().to_owned());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data = serde_json::from_str(value.trim()).ok();
                }
            }
            Some(SseEvent {
                name: name?,
                data: data?,
            })
        })
        .collect()
}
