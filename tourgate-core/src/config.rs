//! Security configuration
//!
//! Loaded once at process start from the environment and passed explicitly
//! to everything that needs it. Nothing here is mutated after loading.

use crate::error::{TourgateError, TourgateResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Fallback signing secret used when `JWT_SECRET` is unset
pub const DEFAULT_JWT_SECRET: &str = "tourgate-default-secret-change-in-production";

/// Minimum secret length below which a warning is emitted
const MIN_SECRET_LEN: usize = 32;

/// JWT signing parameters
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    #[serde(skip_serializing, default)]
    pub secret: String,
    pub issuer: String,
    /// Lifetime of issued access tokens in seconds
    pub expiry_seconds: i64,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

/// Cross-origin policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Exact origins (scheme + host + optional port) allowed to call the API
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime advertised via `Access-Control-Max-Age`
    pub max_age_seconds: u64,
}

impl CorsSettings {
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

/// Advisory rate-limit thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub requests_per_window: u32,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Maximum accepted request body in bytes
    pub max_file_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfSettings {
    pub token_expiry_seconds: i64,
    pub cookie_name: String,
    pub header_name: String,
}

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            _ => Err(format!("Unknown SameSite value: {}", s)),
        }
    }
}

/// Session cookie attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Name of the non-HttpOnly cookie mirroring the client-side auth flag
    pub flag_cookie_name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age_seconds: i64,
}

/// Which identity provider verifies credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Firebase Authentication ID tokens
    Firebase,
    /// Locally signed HS256 tokens (development and tests)
    Jwt,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firebase" => Ok(ProviderKind::Firebase),
            "jwt" | "local" => Ok(ProviderKind::Jwt),
            _ => Err(format!("Unknown auth provider: {}", s)),
        }
    }
}

/// Firebase project identifiers
#[derive(Clone, Serialize, Deserialize)]
pub struct FirebaseSettings {
    pub project_id: String,
    pub api_key: Option<String>,
    pub app_id: Option<String>,
    /// OAuth access token with Identity Toolkit admin scope, used to assign
    /// role claims to newly created accounts
    #[serde(skip_serializing)]
    pub admin_token: Option<String>,
}

impl std::fmt::Debug for FirebaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseSettings")
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key)
            .field("app_id", &self.app_id)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub firebase: Option<FirebaseSettings>,
}

/// Process-wide security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt: JwtSettings,
    pub cors: CorsSettings,
    pub rate_limit: RateLimitSettings,
    pub uploads: UploadSettings,
    pub csrf: CsrfSettings,
    pub session: SessionSettings,
    pub provider: ProviderSettings,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt: JwtSettings {
                secret: DEFAULT_JWT_SECRET.to_string(),
                issuer: "tourgate".to_string(),
                expiry_seconds: 3600,
            },
            cors: CorsSettings {
                allowed_origins: vec!["http://localhost:3000".to_string()],
                max_age_seconds: 600,
            },
            rate_limit: RateLimitSettings {
                requests_per_window: 100,
                window_seconds: 60,
            },
            uploads: UploadSettings {
                max_file_size: 5 * 1024 * 1024,
            },
            csrf: CsrfSettings {
                token_expiry_seconds: 3600,
                cookie_name: "csrf_token".to_string(),
                header_name: "x-csrf-token".to_string(),
            },
            session: SessionSettings {
                cookie_name: "__session".to_string(),
                flag_cookie_name: "admin_auth".to_string(),
                secure: true,
                http_only: true,
                same_site: SameSite::Lax,
                max_age_seconds: 60 * 60 * 24 * 5,
            },
            provider: ProviderSettings {
                kind: ProviderKind::Jwt,
                firebase: None,
            },
        }
    }
}

impl SecurityConfig {
    /// Load configuration from the process environment, honouring `.env`
    pub fn from_env() -> TourgateResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; set but unparseable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> TourgateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let secret = get("JWT_SECRET").unwrap_or_else(|| defaults.jwt.secret.clone());

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => defaults.cors.allowed_origins.clone(),
        };

        let firebase = get("FIREBASE_PROJECT_ID").map(|project_id| FirebaseSettings {
            project_id,
            api_key: get("FIREBASE_API_KEY"),
            app_id: get("FIREBASE_APP_ID"),
            admin_token: get("FIREBASE_ADMIN_TOKEN"),
        });

        let kind = match get("AUTH_PROVIDER") {
            Some(kind) => kind
                .parse::<ProviderKind>()
                .map_err(|e| TourgateError::config("AUTH_PROVIDER", e))?,
            None if firebase.is_some() => ProviderKind::Firebase,
            None => ProviderKind::Jwt,
        };

        let config = Self {
            jwt: JwtSettings {
                secret,
                issuer: get("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
                expiry_seconds: parse_or(&get, "JWT_EXPIRY_SECONDS", defaults.jwt.expiry_seconds)?,
            },
            cors: CorsSettings {
                allowed_origins,
                max_age_seconds: parse_or(
                    &get,
                    "CORS_MAX_AGE_SECONDS",
                    defaults.cors.max_age_seconds,
                )?,
            },
            rate_limit: RateLimitSettings {
                requests_per_window: parse_or(
                    &get,
                    "API_RATE_LIMIT",
                    defaults.rate_limit.requests_per_window,
                )?,
                window_seconds: parse_or(
                    &get,
                    "API_RATE_WINDOW_SECONDS",
                    defaults.rate_limit.window_seconds,
                )?,
            },
            uploads: UploadSettings {
                max_file_size: parse_or(&get, "MAX_FILE_SIZE", defaults.uploads.max_file_size)?,
            },
            csrf: CsrfSettings {
                token_expiry_seconds: parse_or(
                    &get,
                    "CSRF_TOKEN_EXPIRY_SECONDS",
                    defaults.csrf.token_expiry_seconds,
                )?,
                ..defaults.csrf
            },
            session: SessionSettings {
                cookie_name: get("SESSION_COOKIE_NAME").unwrap_or(defaults.session.cookie_name),
                secure: parse_or(&get, "SESSION_COOKIE_SECURE", defaults.session.secure)?,
                same_site: parse_or(
                    &get,
                    "SESSION_COOKIE_SAMESITE",
                    defaults.session.same_site,
                )?,
                max_age_seconds: parse_or(
                    &get,
                    "SESSION_MAX_AGE_SECONDS",
                    defaults.session.max_age_seconds,
                )?,
                ..defaults.session
            },
            provider: ProviderSettings { kind, firebase },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints. Weak settings are logged, broken ones
    /// are rejected.
    pub fn validate(&self) -> TourgateResult<()> {
        if self.provider.kind == ProviderKind::Firebase && self.provider.firebase.is_none() {
            return Err(TourgateError::config(
                "FIREBASE_PROJECT_ID",
                "firebase provider selected but no project id configured",
            ));
        }

        if let Some(origin) = self
            .cors
            .allowed_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(TourgateError::config(
                "ALLOWED_ORIGINS",
                format!("origin '{}' must start with http:// or https://", origin),
            ));
        }

        if self.jwt.expiry_seconds <= 0 {
            return Err(TourgateError::config(
                "JWT_EXPIRY_SECONDS",
                "token lifetime must be positive",
            ));
        }

        if self.csrf.token_expiry_seconds <= 0 {
            return Err(TourgateError::config(
                "CSRF_TOKEN_EXPIRY_SECONDS",
                "token lifetime must be positive",
            ));
        }

        if self.session.same_site == SameSite::None && !self.session.secure {
            return Err(TourgateError::config(
                "SESSION_COOKIE_SAMESITE",
                "SameSite=None requires a secure session cookie",
            ));
        }

        if self.uses_default_secret() {
            warn!("JWT_SECRET not set, using the built-in development secret");
        } else if self.jwt.secret.len() < MIN_SECRET_LEN {
            warn!(
                "JWT secret is shorter than {} bytes; use a longer secret in production",
                MIN_SECRET_LEN
            );
        }

        if self.rate_limit.requests_per_window == 0 {
            warn!("API_RATE_LIMIT is 0; clients will be told no requests are allowed");
        }

        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> TourgateResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| TourgateError::config(key, format!("invalid value '{}': {}", raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> TourgateResult<SecurityConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SecurityConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = load(&[]).unwrap();
        assert!(config.uses_default_secret());
        assert_eq!(config.rate_limit.requests_per_window, 100);
        assert_eq!(config.provider.kind, ProviderKind::Jwt);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_reads_documented_variables() {
        let config = load(&[
            ("JWT_SECRET", "a-very-long-secret-value-for-testing-purposes"),
            ("API_RATE_LIMIT", "250"),
            (
                "ALLOWED_ORIGINS",
                "https://tours.example.com/, https://admin.example.com",
            ),
            ("MAX_FILE_SIZE", "1048576"),
        ])
        .unwrap();

        assert!(!config.uses_default_secret());
        assert_eq!(config.rate_limit.requests_per_window, 250);
        assert_eq!(config.uploads.max_file_size, 1_048_576);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://tours.example.com", "https://admin.example.com"]
        );
        assert!(config.cors.is_allowed("https://admin.example.com"));
        assert!(!config.cors.is_allowed("https://evil.example.com"));
    }

    #[test]
    fn test_firebase_selected_when_project_configured() {
        let config = load(&[
            ("FIREBASE_PROJECT_ID", "tours-prod"),
            ("FIREBASE_API_KEY", "key"),
        ])
        .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Firebase);
        let firebase = config.provider.firebase.unwrap();
        assert_eq!(firebase.project_id, "tours-prod");
        assert_eq!(firebase.api_key.as_deref(), Some("key"));
        assert!(firebase.app_id.is_none());
    }

    #[test]
    fn test_firebase_without_project_is_rejected() {
        let err = load(&[("AUTH_PROVIDER", "firebase")]).unwrap_err();
        assert!(matches!(err, TourgateError::Config { key: Some(ref k), .. } if k == "FIREBASE_PROJECT_ID"));
    }

    #[test]
    fn test_invalid_number_is_reported_with_key() {
        let err = load(&[("API_RATE_LIMIT", "lots")]).unwrap_err();
        assert!(matches!(err, TourgateError::Config { key: Some(ref k), .. } if k == "API_RATE_LIMIT"));
    }

    #[test]
    fn test_origin_without_scheme_is_rejected() {
        assert!(load(&[("ALLOWED_ORIGINS", "tours.example.com")]).is_err());
    }

    #[test]
    fn test_samesite_none_requires_secure() {
        let err = load(&[
            ("SESSION_COOKIE_SAMESITE", "none"),
            ("SESSION_COOKIE_SECURE", "false"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("SameSite=None"));
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = load(&[("JWT_SECRET", "super-secret-do-not-print")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-do-not-print"));
        assert!(debug.contains("<redacted>"));
    }
}
