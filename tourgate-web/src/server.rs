//! tourgate web server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use tokio::net::TcpListener;
use tourgate_core::SecurityConfig;
use tracing::{error, info};

/// Main tourgate web server
pub struct TourgateServer {
    config: WebConfig,
    state: AppState,
}

impl TourgateServer {
    /// Create a new server from web and security configuration
    pub fn new(config: WebConfig, security: SecurityConfig) -> WebResult<Self> {
        let state = AppState::new(security)?;

        Ok(Self { config, state })
    }

    /// Start the web server and run until `shutdown` resolves
    pub async fn start_with_shutdown(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting tourgate web server");
        info!("Server address: http://{}", address);
        info!(
            "Identity provider: {} ({} allowed origins)",
            self.state.provider.name(),
            self.state.config.cors.allowed_origins.len()
        );

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).with_graceful_shutdown(shutdown).await {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Start the web server, stopping on Ctrl+C
    pub async fn start(self) -> WebResult<()> {
        self.start_with_shutdown(shutdown_signal()).await
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for TourgateServer
pub struct TourgateServerBuilder {
    config: WebConfig,
    security: SecurityConfig,
}

impl TourgateServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
            security: SecurityConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Use the given security configuration
    pub fn security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<TourgateServer> {
        TourgateServer::new(self.config, self.security)
    }
}

impl Default for TourgateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = TourgateServer::new(WebConfig::default(), SecurityConfig::default());
        assert!(server.is_ok());
    }

    #[test]
    fn test_server_builder() {
        let builder = TourgateServerBuilder::new().host("localhost").port(3000);

        assert_eq!(builder.config.host, "localhost");
        assert_eq!(builder.config.port, 3000);
    }

    #[tokio::test]
    async fn test_server_stops_on_shutdown() {
        let server = TourgateServerBuilder::new().port(0).build().unwrap();
        let result = server.start_with_shutdown(async {}).await;
        assert!(result.is_ok());
    }
}
