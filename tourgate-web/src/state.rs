//! Application state shared by every handler
//!
//! Everything here is immutable after construction; handlers only read it.

use crate::{
    auth::{
        firebase::{FirebaseProvider, FirebaseVerifier},
        jwt::{JwtService, JwtVerifier},
        provider::{IdentityProvider, LocalProvider},
        CredentialVerifier,
    },
    security::SecurityHeaders,
    WebError, WebResult,
};
use std::sync::Arc;
use tourgate_core::{ProviderKind, SecurityConfig};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Security configuration loaded at startup
    pub config: Arc<SecurityConfig>,
    /// Verifies bearer credentials
    pub verifier: Arc<dyn CredentialVerifier>,
    /// Creates accounts and answers reachability probes
    pub provider: Arc<dyn IdentityProvider>,
    /// Local signer for CSRF tokens and development credentials
    pub tokens: Arc<JwtService>,
    /// Precomputed response header policy
    pub security_headers: Arc<SecurityHeaders>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("verifier", &self.verifier.name())
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state with the identity provider selected by `config`
    pub fn new(config: SecurityConfig) -> WebResult<Self> {
        let tokens = Arc::new(JwtService::new(&config.jwt));

        let (verifier, provider): (Arc<dyn CredentialVerifier>, Arc<dyn IdentityProvider>) =
            match config.provider.kind {
                ProviderKind::Jwt => (
                    Arc::new(JwtVerifier::new(tokens.clone())),
                    Arc::new(LocalProvider::new(tokens.clone())),
                ),
                ProviderKind::Firebase => {
                    let firebase = config.provider.firebase.clone().ok_or_else(|| {
                        WebError::Config("firebase provider requires FIREBASE_PROJECT_ID".into())
                    })?;
                    (
                        Arc::new(FirebaseVerifier::new(firebase.project_id.clone())),
                        Arc::new(FirebaseProvider::new(firebase)),
                    )
                }
            };

        info!(
            "Using {} credential verifier and {} identity provider",
            verifier.name(),
            provider.name()
        );

        Ok(Self::with_components(config, tokens, verifier, provider))
    }

    /// Build state from explicit components
    pub fn with_components(
        config: SecurityConfig,
        tokens: Arc<JwtService>,
        verifier: Arc<dyn CredentialVerifier>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let security_headers = Arc::new(SecurityHeaders::from_config(&config));
        Self {
            config: Arc::new(config),
            verifier,
            provider,
            tokens,
            security_headers,
        }
    }
}
