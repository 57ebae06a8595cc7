//! Authentication and authorization failures and their HTTP rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tourgate_core::Permission;
use tracing::error;

/// Every way a request can fail to reach a protected handler
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No credential was supplied")]
    MissingCredential,
    #[error("Credential is invalid")]
    InvalidCredential,
    #[error("Credential has expired")]
    ExpiredCredential,
    #[error("User '{user_id}' lacks permission {required}")]
    InsufficientRole {
        required: Permission,
        user_id: String,
    },
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("CSRF check failed: {0}")]
    CsrfRejected(&'static str),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code used in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::ExpiredCredential => "expired_credential",
            AuthError::InsufficientRole { .. } => "insufficient_role",
            AuthError::ProviderUnavailable(_) => "provider_unavailable",
            AuthError::MalformedRequest(_) => "malformed_request",
            AuthError::CsrfRejected(_) => "csrf_rejected",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidCredential
            | AuthError::ExpiredCredential => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole { .. } | AuthError::CsrfRejected(_) => {
                StatusCode::FORBIDDEN
            }
            AuthError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::ProviderUnavailable(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to clients
    fn public_message(&self) -> String {
        match self {
            AuthError::MissingCredential => "Authentication required".to_string(),
            AuthError::InvalidCredential => "Invalid or malformed credential".to_string(),
            AuthError::ExpiredCredential => "Credential has expired".to_string(),
            AuthError::InsufficientRole { required, .. } => {
                format!("Insufficient permissions: {} required", required)
            }
            AuthError::ProviderUnavailable(_) => {
                "Identity provider is currently unavailable".to_string()
            }
            AuthError::MalformedRequest(detail) => detail.clone(),
            AuthError::CsrfRejected(reason) => format!("CSRF validation failed: {}", reason),
            AuthError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(detail) | AuthError::ProviderUnavailable(detail) = &self {
            error!(code = self.code(), "{}", detail);
        }

        let mut body = json!({
            "success": false,
            "error": self.code(),
            "message": self.public_message(),
        });

        if let AuthError::InsufficientRole { required, .. } = &self {
            body["requiredPermission"] = json!(required.as_str());
            body["requiredRole"] = json!(required.required_role_label());
        }

        (self.status(), Json(body)).into_response()
    }
}
