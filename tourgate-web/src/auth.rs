//! Request authentication and authorization
//!
//! A protected request goes through three steps: pull the credential out of
//! the request, have the configured [`CredentialVerifier`] check it, then
//! resolve the identity's role into permissions and compare against what
//! the handler requires. The extractors below bundle those steps so a
//! handler only runs once they have all passed.

pub mod csrf;
pub mod error;
pub mod firebase;
pub mod handlers;
pub mod jwt;
pub mod provider;
pub mod verifier;


pub use error::AuthError;
pub use verifier::{CredentialVerifier, VerifiedIdentity, VerifyError};

use crate::{cookies::get_cookie, AppState};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::marker::PhantomData;
use tourgate_core::{Permission, SessionSettings, User};
use tracing::{debug, warn};

/// Pull the raw credential from the request.
///
/// The `Authorization: Bearer` header wins over the session cookie. A header
/// using any other scheme is a malformed request rather than a missing
/// credential, so clients notice the mistake.
pub fn extract_credential(
    headers: &HeaderMap,
    session: &SessionSettings,
) -> Result<String, AuthError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| {
            AuthError::MalformedRequest("Authorization header is not valid text".to_string())
        })?;

        let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::MalformedRequest(
                "Authorization header must use the Bearer scheme".to_string(),
            ));
        }

        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    get_cookie(headers, &session.cookie_name).ok_or(AuthError::MissingCredential)
}

/// Authenticate a request: extract, verify and resolve the credential.
///
/// Any failure of the verifier itself (provider down, bad key material) is
/// reported as `invalid_credential`.
pub async fn authenticate(
    verifier: &dyn CredentialVerifier,
    headers: &HeaderMap,
    session: &SessionSettings,
) -> Result<User, AuthError> {
    let credential = extract_credential(headers, session)?;

    let identity = verifier
        .verify(&credential)
        .await
        .map_err(|e| match e {
            VerifyError::Expired => AuthError::ExpiredCredential,
            VerifyError::Invalid(reason) => {
                debug!("{} rejected credential: {}", verifier.name(), reason);
                AuthError::InvalidCredential
            }
            VerifyError::Provider(reason) => {
                warn!("{} verifier failed: {}", verifier.name(), reason);
                AuthError::InvalidCredential
            }
        })?;

    identity.into_user().ok_or_else(|| {
        debug!("Verified identity has no email; refusing admin access");
        AuthError::InvalidCredential
    })
}

/// Check that `user` holds `required`
pub fn authorize(user: User, required: Permission) -> Result<User, AuthError> {
    if user.has_permission(required) {
        Ok(user)
    } else {
        warn!(
            "Permission {} required but user '{}' ({:?}) doesn't have it",
            required, user.id, user.role
        );
        Err(AuthError::InsufficientRole {
            required,
            user_id: user.id,
        })
    }
}

/// Any verified user, regardless of role
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = authenticate(
            app_state.verifier.as_ref(),
            &parts.headers,
            &app_state.config.session,
        )
        .await?;

        debug!("Authenticated user {} ({:?})", user.id, user.role);
        Ok(AuthenticatedUser(user))
    }
}

/// Binds a permission to a type so it can parameterize [`Require`]
pub trait PermissionRequirement {
    const PERMISSION: Permission;
}

/// Permission markers
pub mod require {
    use super::PermissionRequirement;
    use tourgate_core::Permission;

    #[derive(Debug, Clone, Copy)]
    pub struct ReadContent;
    #[derive(Debug, Clone, Copy)]
    pub struct WriteContent;
    #[derive(Debug, Clone, Copy)]
    pub struct DeleteContent;
    #[derive(Debug, Clone, Copy)]
    pub struct ManageUsers;

    impl PermissionRequirement for ReadContent {
        const PERMISSION: Permission = Permission::ReadContent;
    }

    impl PermissionRequirement for WriteContent {
        const PERMISSION: Permission = Permission::WriteContent;
    }

    impl PermissionRequirement for DeleteContent {
        const PERMISSION: Permission = Permission::DeleteContent;
    }

    impl PermissionRequirement for ManageUsers {
        const PERMISSION: Permission = Permission::ManageUsers;
    }
}

/// A verified user holding the permission named by `P`
#[derive(Debug, Clone)]
pub struct Require<P>(pub User, PhantomData<P>);

impl<P> Require<P> {
    pub fn into_user(self) -> User {
        self.0
    }
}

pub type RequireRead = Require<require::ReadContent>;
pub type RequireWrite = Require<require::WriteContent>;
pub type RequireManageUsers = Require<require::ManageUsers>;

impl<P, S> FromRequestParts<S> for Require<P>
where
    P: PermissionRequirement + Send + Sync,
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        let user = authorize(user, P::PERMISSION)?;
        Ok(Require(user, PhantomData))
    }
}
