//! Account management at the identity provider

use super::{error::AuthError, jwt::JwtService};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tourgate_core::Role;
use tracing::info;
use utoipa::ToSchema;

/// Minimum password length accepted by the providers
pub const MIN_PASSWORD_LEN: usize = 6;

/// Account creation request
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Account as reported back by the provider
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAccount {
    pub uid: String,
    pub email: String,
    #[schema(value_type = String, example = "admin")]
    pub role: Role,
    /// False when the account exists but the role claim could not be set yet
    pub role_assigned: bool,
    /// Sign-in credential, only returned by the local provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Outcome of a reachability probe
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub provider: String,
    pub project_id: Option<String>,
    /// Number of signing keys the provider currently publishes
    pub signing_keys: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("account already exists")]
    AlreadyExists,
    #[error("request rejected by provider: {0}")]
    Rejected(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider not configured: {0}")]
    NotConfigured(&'static str),
}

impl From<ProviderError> for AuthError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::AlreadyExists => {
                AuthError::MalformedRequest("An account with this email already exists".to_string())
            }
            ProviderError::Rejected(reason) => AuthError::MalformedRequest(reason),
            ProviderError::Unavailable(reason) => AuthError::ProviderUnavailable(reason),
            ProviderError::NotConfigured(key) => {
                AuthError::ProviderUnavailable(format!("{} is not configured", key))
            }
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, account: &NewAccount) -> Result<CreatedAccount, ProviderError>;

    /// Check that the provider is reachable and configured
    async fn probe(&self) -> Result<ProviderStatus, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Development provider: accounts are not stored anywhere, creation simply
/// mints a credential for the new account.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    tokens: Arc<JwtService>,
}

impl LocalProvider {
    pub fn new(tokens: Arc<JwtService>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProvider for LocalProvider {
    async fn create_user(&self, account: &NewAccount) -> Result<CreatedAccount, ProviderError> {
        let uid = uuid::Uuid::new_v4().to_string();
        let credential = self
            .tokens
            .issue_access_token(&uid, &account.email, Some(account.role))
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;

        info!("Minted local {} account for {}", account.role, account.email);

        Ok(CreatedAccount {
            uid,
            email: account.email.clone(),
            role: account.role,
            role_assigned: true,
            credential: Some(credential),
        })
    }

    async fn probe(&self) -> Result<ProviderStatus, ProviderError> {
        Ok(ProviderStatus {
            provider: self.name().to_string(),
            project_id: None,
            signing_keys: 1,
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{jwt::JwtVerifier, verifier::CredentialVerifier};
    use tourgate_core::JwtSettings;

    #[tokio::test]
    async fn test_local_provider_mints_usable_credential() {
        let tokens = Arc::new(JwtService::new(&JwtSettings {
            secret: "local-provider-test-secret-0123456789".to_string(),
            issuer: "tourgate".to_string(),
            expiry_seconds: 300,
        }));
        let provider = LocalProvider::new(tokens.clone());

        let created = provider
            .create_user(&NewAccount {
                email: "new-admin@example.com".to_string(),
                password: "secret123".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert!(created.role_assigned);
        let credential = created.credential.unwrap();
        let identity = JwtVerifier::new(tokens).verify(&credential).await.unwrap();
        assert_eq!(identity.uid, created.uid);
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_local_probe_always_succeeds() {
        let tokens = Arc::new(JwtService::new(&tourgate_core::SecurityConfig::default().jwt));
        let status = LocalProvider::new(tokens).probe().await.unwrap();
        assert_eq!(status.provider, "local");
        assert!(status.project_id.is_none());
    }

    #[test]
    fn test_provider_errors_map_to_auth_errors() {
        assert_eq!(
            AuthError::from(ProviderError::AlreadyExists).code(),
            "malformed_request"
        );
        assert_eq!(
            AuthError::from(ProviderError::Unavailable("timeout".into())).code(),
            "provider_unavailable"
        );
        assert_eq!(
            AuthError::from(ProviderError::NotConfigured("FIREBASE_API_KEY")).code(),
            "provider_unavailable"
        );
    }
}
