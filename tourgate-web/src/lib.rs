//! tourgate web server
//!
//! Admin API, security headers and admin page shell for the tour booking
//! site. Authentication and role checks live in [`auth`]; every response
//! passes through [`security`].

pub mod auth;
pub mod cookies;
pub mod guard;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod server;
pub mod state;
pub mod templates;

// Re-export main types
pub use server::TourgateServer;
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tourgate_core::{LogFormat, LoggingConfig, TourgateError};
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_file_size;
    let cors = security::cors_layer(&state.config);

    Router::new()
        .nest("/api", routes::api_routes())
        .nest("/admin", routes::admin_routes())
        .nest("/static", routes::static_routes())
        // `{*path}` never matches an empty tail
        .route("/admin/", get(handlers::admin_index))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Outermost, so rejections and fallbacks get headers too
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::security_headers_middleware,
        ))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> WebResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> WebResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup("TOURGATE_PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|_| {
                WebError::Config(format!("TOURGATE_PORT '{}' is not a valid port", port))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("TOURGATE_HOST").unwrap_or(defaults.host),
            port,
        })
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] TourgateError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging(level: &str, format: LogFormat) -> WebResult<()> {
    let config = LoggingConfig {
        format,
        ..LoggingConfig::with_level(level)
    };
    tourgate_core::init_logging(&config)?;
    Ok(())
}
