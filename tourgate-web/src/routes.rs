//! Route definitions for the tourgate web server

use crate::{auth, handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session management
        .route("/csrf-token", get(auth::handlers::csrf_token))
        .route("/auth/session", post(auth::handlers::create_session))
        .route("/auth/logout", post(auth::handlers::logout))
        // Protected admin endpoints
        .route(
            "/admin/protected",
            get(handlers::protected_get).post(handlers::protected_post),
        )
        .route("/admin/verify-access", post(handlers::verify_access))
        // Account management
        .route("/create-admin", post(handlers::create_admin))
        // Diagnostics
        .route("/test-firebase", get(handlers::test_firebase))
        .route("/openapi.json", get(openapi::openapi_json))
        .method_not_allowed_fallback(handlers::method_not_allowed)
}

/// Create admin page routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::admin_index))
        .route("/login", get(handlers::admin_login))
        .route("/{*path}", get(handlers::admin_section))
        .method_not_allowed_fallback(handlers::method_not_allowed)
}

/// Create static asset routes
pub fn static_routes() -> Router<AppState> {
    Router::new()
        .route("/admin.js", get(handlers::admin_script))
        .route("/admin.css", get(handlers::admin_stylesheet))
        .method_not_allowed_fallback(handlers::method_not_allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tourgate_core::SecurityConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_route() {
        let state = AppState::new(SecurityConfig::default()).unwrap();
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_method_gets_json_405() {
        let state = AppState::new(SecurityConfig::default()).unwrap();
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("PUT")
                    .uri("/admin/protected")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
    }
}
