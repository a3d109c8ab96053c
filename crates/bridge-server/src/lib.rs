mod backend;
mod error;
mod handler;

use std::net::SocketAddr;

use axum::{Router, routing};
use bridge_config::Config;
use tower_http::trace::TraceLayer;

pub use backend::BackendClient;
pub use error::ProxyError;

/// The bridge's HTTP front: router plus bind address
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config.backend)?;
        tracing::info!(backend = backend.completions_url(), "forwarding to backend");

        let mut app = Router::new()
            .route("/v1/messages", routing::post(handler::messages))
            .fallback(handler::not_found)
            .with_state(backend);

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, routing::get(handler::health));
        }

        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address(),
        })
    }

    /// Address [`Server::serve`] binds to
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Hand out the router for callers that bind their own listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Bind and serve until `shutdown` is cancelled
    ///
    /// In-flight requests, streams included, are drained before returning.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound or the accept loop errors
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "bridge listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("shutdown requested, draining connections");
            })
            .await?;

        Ok(())
    }
}
