//! Common types used across multiple handlers

use serde::Serialize;
use tourgate_core::User;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Identity provider in use
    #[schema(example = "firebase")]
    pub provider: String,
}

/// Public view of an authenticated user
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    #[schema(example = "u_1234")]
    pub id: String,
    #[schema(example = "ops@example.com")]
    pub email: String,
    #[schema(example = "editor")]
    pub role: Option<String>,
    #[schema(example = json!(["read_content", "view_analytics", "write_content"]))]
    pub permissions: Vec<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role.map(|role| role.as_str().to_string()),
            permissions: user
                .permissions
                .iter()
                .map(|permission| permission.as_str().to_string())
                .collect(),
        }
    }
}

/// Plain acknowledgement
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error body shared by every failing endpoint
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "insufficient_role")]
    pub error: String,
    pub message: String,
    #[schema(example = "write_content")]
    pub required_permission: Option<String>,
    #[schema(example = "ADMIN or EDITOR")]
    pub required_role: Option<String>,
}
