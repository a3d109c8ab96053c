//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use bridge_config::{BackendConfig, Config, HealthConfig, ServerConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config forwarding to `backend_url`
    pub fn new(backend_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                backend: BackendConfig {
                    base_url: backend_url.parse().expect("valid URL"),
                    ..BackendConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Send a bearer token to the backend
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.config.backend.api_key = Some(SecretString::from(key));
        self
    }

    /// Replace the model name on every forwarded request
    pub fn with_model_override(mut self, model: &str) -> Self {
        self.config.backend.model = Some(model.to_owned());
        self
    }

    /// Serve health checks on a different path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
