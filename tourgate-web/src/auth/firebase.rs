//! Firebase Authentication integration
//!
//! ID tokens are RS256 JWTs signed by Google. Signing keys are fetched from
//! the public JWKS endpoint on every verification, so a key rotation is
//! picked up immediately and no state is shared between requests.

use super::{
    provider::{CreatedAccount, IdentityProvider, NewAccount, ProviderError, ProviderStatus},
    verifier::{CredentialVerifier, VerifiedIdentity, VerifyError},
};
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tourgate_core::FirebaseSettings;
use tracing::{debug, info, warn};

/// Google's JWKS for Firebase ID tokens
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Identity Toolkit REST base
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Claims of a Firebase ID token that this layer reads
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    /// Custom claim set through the Admin API
    role: Option<String>,
}

/// Endpoints, overridable for tests and emulators
#[derive(Debug, Clone)]
pub struct FirebaseEndpoints {
    pub jwks_url: String,
    pub identity_toolkit_url: String,
}

impl Default for FirebaseEndpoints {
    fn default() -> Self {
        Self {
            jwks_url: FIREBASE_JWKS_URL.to_string(),
            identity_toolkit_url: IDENTITY_TOOLKIT_URL.to_string(),
        }
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_default()
}

async fn fetch_jwks(client: &reqwest::Client, url: &str) -> Result<JwkSet, reqwest::Error> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await
}

/// Verifies Firebase ID tokens for one project
#[derive(Debug, Clone)]
pub struct FirebaseVerifier {
    project_id: String,
    endpoints: FirebaseEndpoints,
    client: reqwest::Client,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_endpoints(project_id, FirebaseEndpoints::default())
    }

    pub fn with_endpoints(project_id: impl Into<String>, endpoints: FirebaseEndpoints) -> Self {
        Self {
            project_id: project_id.into(),
            endpoints,
            client: http_client(),
        }
    }

    /// Expected `iss` claim for this project
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

#[async_trait]
impl CredentialVerifier for FirebaseVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerifyError> {
        let header = decode_header(credential)
            .map_err(|e| VerifyError::Invalid(format!("unreadable header: {}", e)))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::Invalid(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::Invalid("missing key id".to_string()))?;

        let jwks = fetch_jwks(&self.client, &self.endpoints.jwks_url)
            .await
            .map_err(|e| VerifyError::Provider(e.to_string()))?;

        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| VerifyError::Invalid(format!("unknown key id {}", kid)))?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| VerifyError::Provider(format!("unusable signing key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let claims = decode::<FirebaseClaims>(credential, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Invalid(e.to_string()),
            })?;

        if claims.sub.is_empty() {
            return Err(VerifyError::Invalid("empty subject".to_string()));
        }

        debug!("Verified Firebase token for {}", claims.sub);
        Ok(VerifiedIdentity {
            uid: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }

    fn name(&self) -> &'static str {
        "firebase"
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Account management through the Identity Toolkit REST API
#[derive(Debug, Clone)]
pub struct FirebaseProvider {
    settings: FirebaseSettings,
    endpoints: FirebaseEndpoints,
    client: reqwest::Client,
}

impl FirebaseProvider {
    pub fn new(settings: FirebaseSettings) -> Self {
        Self::with_endpoints(settings, FirebaseEndpoints::default())
    }

    pub fn with_endpoints(settings: FirebaseSettings, endpoints: FirebaseEndpoints) -> Self {
        Self {
            settings,
            endpoints,
            client: http_client(),
        }
    }

    async fn provider_error(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) if envelope.error.message.starts_with("EMAIL_EXISTS") => {
                ProviderError::AlreadyExists
            }
            Ok(envelope) if status.is_client_error() => {
                ProviderError::Rejected(envelope.error.message)
            }
            Ok(envelope) => ProviderError::Unavailable(envelope.error.message),
            Err(_) if status.is_client_error() => ProviderError::Rejected(status.to_string()),
            Err(_) => ProviderError::Unavailable(status.to_string()),
        }
    }

    /// Attach the role custom claim. Requires an admin access token.
    async fn assign_role(&self, uid: &str, account: &NewAccount) -> Result<bool, ProviderError> {
        let Some(admin_token) = &self.settings.admin_token else {
            warn!(
                "FIREBASE_ADMIN_TOKEN not set; account {} created without a role claim",
                uid
            );
            return Ok(false);
        };

        let url = format!(
            "{}/projects/{}/accounts:update",
            self.endpoints.identity_toolkit_url, self.settings.project_id
        );
        let attributes = json!({ "role": account.role.as_str() }).to_string();
        let response = self
            .client
            .post(url)
            .bearer_auth(admin_token)
            .json(&json!({ "localId": uid, "customAttributes": attributes }))
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }
        Ok(true)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseProvider {
    async fn create_user(&self, account: &NewAccount) -> Result<CreatedAccount, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("FIREBASE_API_KEY"))?;

        let url = format!(
            "{}/accounts:signUp?key={}",
            self.endpoints.identity_toolkit_url, api_key
        );
        let response = self
            .client
            .post(url)
            .json(&json!({
                "email": account.email,
                "password": account.password,
                "returnSecureToken": false,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let created: SignUpResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("unreadable response: {}", e)))?;

        // The account exists from here on, whatever happens to the claim
        let role_assigned = match self.assign_role(&created.local_id, account).await {
            Ok(assigned) => assigned,
            Err(e) => {
                warn!(
                    "Account {} created but role claim not assigned: {}",
                    created.local_id, e
                );
                false
            }
        };
        info!(
            "Created Firebase account {} (role assigned: {})",
            created.local_id, role_assigned
        );

        Ok(CreatedAccount {
            uid: created.local_id,
            email: created.email.unwrap_or_else(|| account.email.clone()),
            role: account.role,
            role_assigned,
            credential: None,
        })
    }

    async fn probe(&self) -> Result<ProviderStatus, ProviderError> {
        let jwks = fetch_jwks(&self.client, &self.endpoints.jwks_url)
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        Ok(ProviderStatus {
            provider: self.name().to_string(),
            project_id: Some(self.settings.project_id.clone()),
            signing_keys: jwks.keys.len(),
        })
    }

    fn name(&self) -> &'static str {
        "firebase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourgate_core::Role;

    /// Header `{"alg":"RS256","kid":"k1","typ":"JWT"}`, unsigned payload
    const RS256_TOKEN: &str =
        "eyJhbGciOiJSUzI1NiIsImtpZCI6ImsxIiwidHlwIjoiSldUIn0.eyJzdWIiOiJ1MSJ9.c2ln";
    /// Header `{"alg":"HS256","typ":"JWT"}`
    const HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ1MSJ9.c2ln";

    fn unreachable_endpoints() -> FirebaseEndpoints {
        FirebaseEndpoints {
            jwks_url: "http://127.0.0.1:9/jwks".to_string(),
            identity_toolkit_url: "http://127.0.0.1:9".to_string(),
        }
    }

    fn settings(api_key: Option<&str>) -> FirebaseSettings {
        FirebaseSettings {
            project_id: "tours-test".to_string(),
            api_key: api_key.map(str::to_string),
            app_id: None,
            admin_token: None,
        }
    }

    #[test]
    fn test_issuer_follows_project() {
        let verifier = FirebaseVerifier::new("tours-test");
        assert_eq!(verifier.issuer(), "https://securetoken.google.com/tours-test");
    }

    #[tokio::test]
    async fn test_rejects_non_rs256_tokens_before_fetching_keys() {
        let verifier = FirebaseVerifier::with_endpoints("tours-test", unreachable_endpoints());
        let result = verifier.verify(HS256_TOKEN).await;
        assert!(matches!(result, Err(VerifyError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        let verifier = FirebaseVerifier::with_endpoints("tours-test", unreachable_endpoints());
        let result = verifier.verify("garbage").await;
        assert!(matches!(result, Err(VerifyError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_unreachable_key_endpoint_is_a_provider_error() {
        let verifier = FirebaseVerifier::with_endpoints("tours-test", unreachable_endpoints());
        let result = verifier.verify(RS256_TOKEN).await;
        assert!(matches!(result, Err(VerifyError::Provider(_))));
    }

    #[tokio::test]
    async fn test_create_user_requires_api_key() {
        let provider = FirebaseProvider::with_endpoints(settings(None), unreachable_endpoints());
        let result = provider
            .create_user(&NewAccount {
                email: "a@example.com".to_string(),
                password: "secret123".to_string(),
                role: Role::Admin,
            })
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::NotConfigured("FIREBASE_API_KEY"))
        ));
    }

    /// Identity Toolkit stand-in: sign-up succeeds, claim updates fail
    async fn spawn_toolkit_without_updates() -> String {
        use axum::{http::StatusCode, routing::post, Json, Router};

        let app = Router::new()
            .route(
                "/accounts:signUp",
                post(|| async {
                    Json(json!({ "localId": "fb-uid-1", "email": "new@tours.example" }))
                }),
            )
            .route(
                "/projects/tours-test/accounts:update",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": { "message": "INTERNAL_ERROR" } })),
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", address)
    }

    #[tokio::test]
    async fn test_failed_role_claim_still_reports_created_account() {
        let base = spawn_toolkit_without_updates().await;
        let mut settings = settings(Some("key"));
        settings.admin_token = Some("admin-token".to_string());
        let provider = FirebaseProvider::with_endpoints(
            settings,
            FirebaseEndpoints {
                jwks_url: format!("{}/jwks", base),
                identity_toolkit_url: base,
            },
        );

        let created = provider
            .create_user(&NewAccount {
                email: "new@tours.example".to_string(),
                password: "secret123".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert_eq!(created.uid, "fb-uid-1");
        assert_eq!(created.email, "new@tours.example");
        assert!(!created.role_assigned);
    }

    #[tokio::test]
    async fn test_probe_reports_unreachable_provider() {
        let provider =
            FirebaseProvider::with_endpoints(settings(Some("key")), unreachable_endpoints());
        assert!(matches!(
            provider.probe().await,
            Err(ProviderError::Unavailable(_))
        ));
    }
}
