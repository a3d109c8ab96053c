#![allow(clippy::must_use_candidate)]

pub mod backend;
mod env;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use backend::*;
pub use server::*;
pub use telemetry::*;

/// Top-level bridge configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat Completions backend the bridge forwards to
    #[serde(default)]
    pub backend: BackendConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
