//! HTTP client for the Chat Completions backend

use bridge_config::BackendConfig;
use bridge_translate::OpenAiRequest;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ProxyError;

/// Client for the single configured backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    completions_url: String,
    api_key: Option<SecretString>,
    model: Option<String>,
}

impl BackendClient {
    /// Build the client from backend configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is invalid or the TLS backend cannot
    /// be initialized
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let timeout = config.timeout()?;

        // Per-read rather than total, so long streams are not cut off
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            completions_url: config.completions_url(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Endpoint requests are posted to
    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    /// Post a chat completion request
    ///
    /// The configured model, if any, replaces the request's. A non-success
    /// status is turned into [`ProxyError::BackendRejected`] with the body
    /// read in full, or a note naming the read failure when the body cannot
    /// be read. On success the response is returned unread.
    pub async fn send(&self, mut request: OpenAiRequest) -> Result<reqwest::Response, ProxyError> {
        if let Some(model) = &self.model {
            request.model.clone_from(model);
        }

        let mut builder = self.client.post(&self.completions_url).json(&request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(url = %self.completions_url, error = %e, "backend request failed");
            ProxyError::BackendUnreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(%status, error = %e, "failed to read backend error body");
                format!("Backend returned {status}; error body unreadable: {e}")
            });
            tracing::warn!(%status, "backend rejected request");
            return Err(ProxyError::BackendRejected { status, body });
        }

        Ok(response)
    }
}
