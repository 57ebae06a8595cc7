//! OpenAPI specification for the tourgate web server

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tourgate_core::SecurityConfig;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    auth::provider::{CreatedAccount, ProviderStatus},
    handlers::{
        CreateAdminRequest, CreateAdminResponse, CsrfTokenResponse, ErrorResponse,
        HealthResponse, MessageResponse, ProtectedResponse, ProviderProbeResponse,
        SessionResponse, UserSummary, VerifyAccessResponse,
    },
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tourgate Admin API",
        version = "0.1.0",
        description = "Authentication, role checks and account management for the tour booking admin",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::auth::handlers::csrf_token,
        crate::auth::handlers::create_session,
        crate::auth::handlers::logout,

        crate::handlers::protected_get,
        crate::handlers::protected_post,
        crate::handlers::verify_access,

        crate::handlers::create_admin,
        crate::handlers::test_firebase,
    ),
    components(
        schemas(
            HealthResponse,
            UserSummary,
            MessageResponse,
            ErrorResponse,
            ProtectedResponse,
            VerifyAccessResponse,
            CsrfTokenResponse,
            SessionResponse,
            CreateAdminRequest,
            CreateAdminResponse,
            CreatedAccount,
            ProviderProbeResponse,
            ProviderStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Sessions and CSRF tokens"),
        (name = "Admin", description = "Role-protected admin endpoints"),
        (name = "Accounts", description = "Account management at the identity provider"),
        (name = "Diagnostics", description = "Identity provider checks"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the credential schemes the admin endpoints accept, using the
/// default session cookie name
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        register_schemes(openapi, &SecurityConfig::default().session.cookie_name);
    }
}

fn register_schemes(openapi: &mut utoipa::openapi::OpenApi, session_cookie: &str) {
    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(session_cookie))),
        );
    }
}

/// The API document as served, naming the configured session cookie
pub fn document(config: &SecurityConfig) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    register_schemes(&mut openapi, &config.session.cookie_name);
    openapi
}

/// `GET /api/openapi.json`
pub async fn openapi_json(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(document(&state.config)))
}
