//! Admin account creation

use super::types::{CreateAdminRequest, CreateAdminResponse, ErrorResponse};
use crate::{
    auth::{
        csrf::CsrfVerified,
        provider::{NewAccount, MIN_PASSWORD_LEN},
        AuthError, RequireManageUsers,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tourgate_core::Role;
use tracing::{info, warn};

fn validate_request(request: &CreateAdminRequest) -> Result<(), AuthError> {
    let email = request.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(AuthError::MalformedRequest(
            "A valid email address is required".to_string(),
        ));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::MalformedRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Create an admin account at the identity provider
#[utoipa::path(
    post,
    path = "/api/create-admin",
    tag = "Accounts",
    summary = "Create an admin account",
    description = "Requires the manage_users permission and a valid CSRF token in the X-CSRF-Token header",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 200, description = "Account created", body = CreateAdminResponse),
        (status = 400, description = "Invalid body or rejected by the provider", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired credential", body = ErrorResponse),
        (status = 403, description = "Not an admin or CSRF check failed", body = ErrorResponse),
        (status = 500, description = "Identity provider unavailable", body = ErrorResponse)
    )
)]
pub async fn create_admin(
    State(state): State<AppState>,
    guard: RequireManageUsers,
    _csrf: CsrfVerified,
    payload: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> Result<Json<CreateAdminResponse>, AuthError> {
    let caller = guard.into_user();
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected create-admin body: {}", rejection.body_text());
        AuthError::MalformedRequest(rejection.body_text())
    })?;
    validate_request(&request)?;

    let account = NewAccount {
        email: request.email.trim().to_string(),
        password: request.password,
        role: Role::Admin,
    };
    let created = state.provider.create_user(&account).await?;

    info!(
        "Admin account {} created by {} via {}",
        created.email,
        caller.email,
        state.provider.name()
    );

    Ok(Json(CreateAdminResponse {
        success: true,
        message: format!("Admin account created for {}", created.email),
        account: created,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> CreateAdminRequest {
        CreateAdminRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_request() {
        assert!(validate_request(&request("ops@example.com", "secret1")).is_ok());
        assert!(validate_request(&request("not-an-email", "secret1")).is_err());
        assert!(validate_request(&request("@example.com", "secret1")).is_err());
        assert!(validate_request(&request("ops@example.com", "short")).is_err());
    }
}
