//! HTTP request handlers for the tourgate web server
//!
//! This module contains all the HTTP request handlers organized by functionality.

pub mod accounts;
pub mod admin;
pub mod health;
pub mod pages;
pub mod provider;
pub mod types;

pub use accounts::*;
pub use admin::*;
pub use health::*;
pub use pages::*;
pub use provider::*;

pub use types::*;

use axum::{http::StatusCode, response::Json};

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse {
            success: false,
            message: "Not found".to_string(),
        }),
    )
}

/// Fallback for known routes called with an unsupported method
pub async fn method_not_allowed() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MessageResponse {
            success: false,
            message: "Method not allowed".to_string(),
        }),
    )
}
