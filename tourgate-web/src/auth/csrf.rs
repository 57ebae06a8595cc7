//! Double-submit CSRF tokens
//!
//! A token is a short-lived signed JWT handed out both as a cookie and in
//! the response body. State-changing requests must echo it in a header; the
//! header must equal the cookie and carry a valid signature.

use super::{error::AuthError, jwt::JwtService, verifier::VerifyError};
use crate::{cookies::get_cookie, AppState};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tourgate_core::CsrfSettings;
use tracing::debug;

const CSRF_PURPOSE: &str = "csrf";

#[derive(Debug, Serialize, Deserialize)]
struct CsrfClaims {
    purpose: String,
    nonce: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Mint a fresh CSRF token
pub fn issue_token(tokens: &JwtService, settings: &CsrfSettings) -> Result<String, AuthError> {
    let now = Utc::now();
    tokens.sign(&CsrfClaims {
        purpose: CSRF_PURPOSE.to_string(),
        nonce: uuid::Uuid::new_v4().to_string(),
        iss: tokens.issuer().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(settings.token_expiry_seconds)).timestamp(),
    })
}

/// Check a submitted header token against the cookie token
pub fn validate(
    tokens: &JwtService,
    cookie_token: Option<&str>,
    header_token: Option<&str>,
) -> Result<(), AuthError> {
    let cookie_token = cookie_token.ok_or(AuthError::CsrfRejected("missing cookie"))?;
    let header_token = header_token.ok_or(AuthError::CsrfRejected("missing header"))?;

    if cookie_token != header_token {
        return Err(AuthError::CsrfRejected("token mismatch"));
    }

    let claims: CsrfClaims = tokens.decode(header_token).map_err(|e| {
        debug!("CSRF token rejected: {}", e);
        match e {
            VerifyError::Expired => AuthError::CsrfRejected("token expired"),
            _ => AuthError::CsrfRejected("invalid token"),
        }
    })?;

    if claims.purpose != CSRF_PURPOSE {
        return Err(AuthError::CsrfRejected("invalid token"));
    }
    Ok(())
}

/// Extractor that passes only when the request carries a valid CSRF token
#[derive(Debug, Clone, Copy)]
pub struct CsrfVerified;

impl<S> FromRequestParts<S> for CsrfVerified
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let settings = &state.config.csrf;

        let cookie_token = get_cookie(&parts.headers, &settings.cookie_name);
        let header_token = parts
            .headers
            .get(settings.header_name.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        validate(
            &state.tokens,
            cookie_token.as_deref(),
            header_token.as_deref(),
        )?;
        Ok(CsrfVerified)
    }
}
