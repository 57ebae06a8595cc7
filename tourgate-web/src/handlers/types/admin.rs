//! Types for the protected admin endpoints

use super::UserSummary;
use serde::Serialize;
use utoipa::ToSchema;

/// Response of the protected admin resource
#[derive(Serialize, ToSchema)]
pub struct ProtectedResponse {
    pub success: bool,
    #[schema(example = "Access granted")]
    pub message: String,
    pub user: UserSummary,
    /// Echo of the submitted JSON body (POST only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub received: Option<serde_json::Value>,
}

/// Response of the access check
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAccessResponse {
    pub success: bool,
    pub has_access: bool,
    pub user: UserSummary,
}

/// Issued CSRF token
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub success: bool,
    pub csrf_token: String,
    /// Header the token has to be echoed in
    #[schema(example = "x-csrf-token")]
    pub header_name: String,
    pub expires_in: i64,
}

/// Result of establishing a session
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub user: UserSummary,
}
