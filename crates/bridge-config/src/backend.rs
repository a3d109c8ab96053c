use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Base URL used when no backend is configured (a local llama.cpp server)
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Chat Completions backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL; `/v1/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Bearer token sent to the backend
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Request timeout (e.g. "300s", "5m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Model name sent to the backend instead of the one in the request
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout: default_timeout(),
            model: None,
        }
    }
}

impl BackendConfig {
    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout).map_err(|e| anyhow::anyhow!("invalid backend timeout '{}': {e}", self.timeout))
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/v1/chat/completions")
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BACKEND_URL).expect("valid default URL")
}

fn default_timeout() -> String {
    "300s".to_string()
}
