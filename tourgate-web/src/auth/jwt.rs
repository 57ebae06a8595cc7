//! Locally signed HS256 credentials
//!
//! Used as the credential format when no external identity provider is
//! configured, and as the signing primitive for CSRF tokens.

use super::{
    error::AuthError,
    verifier::{CredentialVerifier, VerifiedIdentity, VerifyError},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tourgate_core::{JwtSettings, Role};
use tracing::{debug, warn};

/// Claims carried by an access credential
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    pub email: Option<String>,
    /// Role name; unknown names are tolerated and resolve to no permissions
    pub role: Option<String>,
    pub iss: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn into_identity(self) -> VerifiedIdentity {
        VerifiedIdentity {
            uid: self.sub,
            email: self.email,
            role: self.role,
        }
    }
}

/// Signs and verifies HS256 tokens with the configured secret
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    lifetime: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(settings: &JwtSettings) -> Self {
        let secret = settings.secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: settings.issuer.clone(),
            lifetime: Duration::seconds(settings.expiry_seconds),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue an access credential with the configured lifetime
    pub fn issue_access_token(
        &self,
        uid: &str,
        email: &str,
        role: Option<Role>,
    ) -> Result<String, AuthError> {
        self.issue_with_lifetime(uid, email, role.map(|r| r.to_string()), self.lifetime)
    }

    /// Issue an access credential with an explicit lifetime and raw role name.
    /// A negative lifetime produces an already expired credential.
    pub fn issue_with_lifetime(
        &self,
        uid: &str,
        email: &str,
        role: Option<String>,
        lifetime: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: uid.to_string(),
            email: Some(email.to_string()),
            role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| {
            warn!("Failed to encode JWT: {}", e);
            AuthError::Internal(format!("token signing failed: {}", e))
        })
    }

    /// Verify signature, issuer and expiry, then decode the claims
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        decode::<T>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => {
                    debug!("Token verification failed: {}", e);
                    VerifyError::Invalid(e.to_string())
                }
            })
    }
}

/// Credential verifier backed by [`JwtService`]
#[derive(Debug, Clone)]
pub struct JwtVerifier {
    service: Arc<JwtService>,
}

impl JwtVerifier {
    pub fn new(service: Arc<JwtService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CredentialVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerifyError> {
        let claims: Claims = self.service.decode(credential)?;
        if claims.sub.is_empty() {
            return Err(VerifyError::Invalid("empty subject".to_string()));
        }
        Ok(claims.into_identity())
    }

    fn name(&self) -> &'static str {
        "jwt"
    }
}
