//! Session and CSRF token endpoints

use super::{csrf, extract_credential, AuthError, AuthenticatedUser};
use crate::{
    cookies::{expired_cookie, flag_cookie, session_cookie, CookieSpec},
    handlers::types::{
        CsrfTokenResponse, ErrorResponse, MessageResponse, SessionResponse, UserSummary,
    },
    AppState,
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Json},
};
use tracing::info;

/// Issue a CSRF token
///
/// The token is set as a cookie and returned in the body; state-changing
/// requests must send it back in the CSRF header.
#[utoipa::path(
    get,
    path = "/api/csrf-token",
    tag = "Auth",
    summary = "Issue a CSRF token",
    responses(
        (status = 200, description = "Token issued", body = CsrfTokenResponse),
        (status = 500, description = "Token could not be signed", body = ErrorResponse)
    )
)]
pub async fn csrf_token(State(state): State<AppState>) -> Result<impl IntoResponse, AuthError> {
    let settings = &state.config.csrf;
    let token = csrf::issue_token(&state.tokens, settings)?;

    let cookie = CookieSpec {
        name: &settings.cookie_name,
        value: &token,
        max_age_seconds: settings.token_expiry_seconds,
        // Must be readable by the page so it can echo it in the header
        http_only: false,
        secure: state.config.session.secure,
        same_site: tourgate_core::SameSite::Strict,
    }
    .to_header_value();

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(CsrfTokenResponse {
            success: true,
            csrf_token: token,
            header_name: settings.header_name.clone(),
            expires_in: settings.token_expiry_seconds,
        }),
    ))
}

/// Establish a browser session from a verified credential
#[utoipa::path(
    post,
    path = "/api/auth/session",
    tag = "Auth",
    summary = "Create a session",
    description = "Verifies the bearer credential and stores it in the session cookie together with the admin UX flag",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session established", body = SessionResponse),
        (status = 401, description = "Missing, invalid or expired credential", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AuthError> {
    let session = &state.config.session;
    let credential = extract_credential(&headers, session)?;

    info!("Session established for {} ({:?})", user.email, user.role);

    Ok((
        AppendHeaders([
            (SET_COOKIE, session_cookie(session, &credential)),
            (SET_COOKIE, flag_cookie(session)),
        ]),
        Json(SessionResponse {
            success: true,
            user: UserSummary::from(&user),
        }),
    ))
}

/// Clear the session and flag cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "End the session",
    responses(
        (status = 200, description = "Cookies cleared", body = MessageResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let session = &state.config.session;
    (
        AppendHeaders([
            (
                SET_COOKIE,
                expired_cookie(&session.cookie_name, session.secure, session.same_site),
            ),
            (
                SET_COOKIE,
                expired_cookie(&session.flag_cookie_name, session.secure, session.same_site),
            ),
        ]),
        Json(MessageResponse::ok("Logged out")),
    )
}
