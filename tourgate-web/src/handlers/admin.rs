//! Protected admin endpoints

use super::types::{ErrorResponse, ProtectedResponse, UserSummary, VerifyAccessResponse};
use crate::auth::{AuthError, RequireRead, RequireWrite};
use axum::{body::Bytes, response::Json};
use tracing::{debug, info};

/// Read the protected admin resource
#[utoipa::path(
    get,
    path = "/api/admin/protected",
    tag = "Admin",
    summary = "Protected resource",
    description = "Requires the read_content permission",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    responses(
        (status = 200, description = "Access granted", body = ProtectedResponse),
        (status = 401, description = "Missing, invalid or expired credential", body = ErrorResponse),
        (status = 403, description = "Role lacks read_content", body = ErrorResponse)
    )
)]
pub async fn protected_get(guard: RequireRead) -> Json<ProtectedResponse> {
    let user = guard.into_user();
    debug!("Protected resource read by {}", user.email);

    Json(ProtectedResponse {
        success: true,
        message: format!("Access granted to {}", user.email),
        user: UserSummary::from(&user),
        received: None,
    })
}

/// Submit data to the protected admin resource
///
/// The JSON body is echoed back as `received`.
#[utoipa::path(
    post,
    path = "/api/admin/protected",
    tag = "Admin",
    summary = "Write to protected resource",
    description = "Requires the write_content permission",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    request_body(content = Object, description = "Any JSON document"),
    responses(
        (status = 200, description = "Data accepted", body = ProtectedResponse),
        (status = 400, description = "Body is not JSON", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired credential", body = ErrorResponse),
        (status = 403, description = "Role lacks write_content", body = ErrorResponse)
    )
)]
pub async fn protected_post(
    guard: RequireWrite,
    body: Bytes,
) -> Result<Json<ProtectedResponse>, AuthError> {
    let user = guard.into_user();

    let received = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AuthError::MalformedRequest(format!("Invalid JSON body: {}", e)))?
    };

    info!("Protected resource updated by {}", user.email);

    Ok(Json(ProtectedResponse {
        success: true,
        message: "Data received".to_string(),
        user: UserSummary::from(&user),
        received: Some(received),
    }))
}

/// Check whether the caller may use the admin dashboard
///
/// Admins and editors pass; viewers get `insufficient_role` naming the
/// roles that would.
#[utoipa::path(
    post,
    path = "/api/admin/verify-access",
    tag = "Admin",
    summary = "Verify dashboard access",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    responses(
        (status = 200, description = "Caller has access", body = VerifyAccessResponse),
        (status = 401, description = "Missing, invalid or expired credential", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin or editor", body = ErrorResponse)
    )
)]
pub async fn verify_access(guard: RequireWrite) -> Json<VerifyAccessResponse> {
    let user = guard.into_user();
    info!("Dashboard access confirmed for {} ({:?})", user.email, user.role);

    Json(VerifyAccessResponse {
        success: true,
        has_access: true,
        user: UserSummary::from(&user),
    })
}
