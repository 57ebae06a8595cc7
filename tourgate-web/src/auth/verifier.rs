//! Credential verification against an identity provider

use async_trait::async_trait;
use tourgate_core::{parse_role, User};

/// Identity asserted by a verified credential, before role resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider-assigned account id
    pub uid: String,
    pub email: Option<String>,
    /// Raw role claim, if the provider attached one
    pub role: Option<String>,
}

impl VerifiedIdentity {
    /// Resolve this identity into a user record.
    ///
    /// Admin accounts are email/password accounts, so an identity without an
    /// email is not a usable admin identity.
    pub fn into_user(self) -> Option<User> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let role = parse_role(self.role.as_deref());
        Some(User::new(self.uid, email, role))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("credential expired")]
    Expired,
    #[error("credential rejected: {0}")]
    Invalid(String),
    #[error("identity provider unavailable: {0}")]
    Provider(String),
}

/// Validates an opaque bearer credential
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerifyError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
