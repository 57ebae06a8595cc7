//! Security headers for every response
//!
//! Headers are computed once from [`SecurityConfig`] and inserted (never
//! appended) by the middleware, so applying them twice is the same as once.
//! Cross-origin headers and preflights are handled by [`cors_layer`].

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{
        header::{
            AUTHORIZATION, CACHE_CONTROL, CONTENT_SECURITY_POLICY, CONTENT_TYPE,
            REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
        HeaderMap, HeaderName, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tourgate_core::SecurityConfig;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

/// Policy for HTML pages. No inline scripts are served, so none are allowed.
pub const PAGE_CSP: &str = "default-src 'self'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' data: https:; \
     connect-src 'self' https://identitytoolkit.googleapis.com https://securetoken.googleapis.com; \
     frame-ancestors 'none'; \
     base-uri 'self'; \
     form-action 'self'";

/// JSON responses never load anything
pub const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

const HSTS: &str = "max-age=31536000; includeSubDomains";

static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_WINDOW: HeaderName = HeaderName::from_static("x-ratelimit-window");
static X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

/// CORS policy for the configured allow-list
///
/// Only listed origins receive `Access-Control-Allow-Origin`; preflights are
/// answered by the layer before routing.
pub fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping unusable CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let mut headers = vec![AUTHORIZATION, CONTENT_TYPE];
    match HeaderName::from_bytes(config.csrf.header_name.as_bytes()) {
        Ok(name) => headers.push(name),
        Err(_) => warn!("CSRF header {:?} is not a valid header name", config.csrf.header_name),
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list(headers))
        .max_age(Duration::from_secs(config.cors.max_age_seconds))
}

/// Which header variant a path gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Page,
    AdminPage,
    Api,
    AdminApi,
}

impl RouteClass {
    pub fn classify(path: &str) -> Self {
        let under = |prefix: &str| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        };

        if under("/api/admin") {
            Self::AdminApi
        } else if under("/api") {
            Self::Api
        } else if under("/admin") {
            Self::AdminPage
        } else {
            Self::Page
        }
    }

    pub fn is_api(self) -> bool {
        matches!(self, Self::Api | Self::AdminApi)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::AdminPage | Self::AdminApi)
    }
}

/// Precomputed header values
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    page_csp: HeaderValue,
    api_csp: HeaderValue,
    rate_limit: HeaderValue,
    rate_window: HeaderValue,
}

impl SecurityHeaders {
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self {
            page_csp: HeaderValue::from_static(PAGE_CSP),
            api_csp: HeaderValue::from_static(API_CSP),
            rate_limit: HeaderValue::from(config.rate_limit.requests_per_window),
            rate_window: HeaderValue::from(config.rate_limit.window_seconds),
        }
    }

    /// Attach the header set for `path` to `headers`
    pub fn apply(&self, headers: &mut HeaderMap, path: &str) {
        let class = RouteClass::classify(path);

        let csp = if class.is_api() {
            &self.api_csp
        } else {
            &self.page_csp
        };
        headers.insert(CONTENT_SECURITY_POLICY, csp.clone());
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        );
        headers.insert(STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS));

        if class.is_api() {
            headers.insert(X_RATELIMIT_LIMIT.clone(), self.rate_limit.clone());
            headers.insert(X_RATELIMIT_WINDOW.clone(), self.rate_window.clone());
        }

        if class.is_admin() {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            headers.insert(X_ROBOTS_TAG.clone(), HeaderValue::from_static("noindex, nofollow"));
        }
    }
}

/// Security headers middleware
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;
    state.security_headers.apply(response.headers_mut(), &path);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_for(path: &str) -> HeaderMap {
        let policy = SecurityHeaders::from_config(&SecurityConfig::default());
        let mut headers = HeaderMap::new();
        policy.apply(&mut headers, path);
        headers
    }

    #[test]
    fn test_route_classification() {
        assert_eq!(RouteClass::classify("/"), RouteClass::Page);
        assert_eq!(RouteClass::classify("/tours/lisbon"), RouteClass::Page);
        assert_eq!(RouteClass::classify("/admin"), RouteClass::AdminPage);
        assert_eq!(RouteClass::classify("/admin/bookings"), RouteClass::AdminPage);
        assert_eq!(RouteClass::classify("/administrator"), RouteClass::Page);
        assert_eq!(RouteClass::classify("/api/health"), RouteClass::Api);
        assert_eq!(RouteClass::classify("/api/admin/protected"), RouteClass::AdminApi);
        assert_eq!(RouteClass::classify("/apis"), RouteClass::Page);
    }

    #[test]
    fn test_api_paths_get_strict_csp_and_rate_limit_headers() {
        let headers = headers_for("/api/health");
        assert_eq!(headers[CONTENT_SECURITY_POLICY], API_CSP);
        assert_eq!(headers["x-ratelimit-limit"], "100");
        assert_eq!(headers["x-ratelimit-window"], "60");
        assert!(headers.get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_page_paths_get_page_csp() {
        let headers = headers_for("/");
        assert_eq!(headers[CONTENT_SECURITY_POLICY], PAGE_CSP);
        assert_eq!(headers[X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[REFERRER_POLICY], "strict-origin-when-cross-origin");
        assert!(headers.get("x-ratelimit-limit").is_none());
    }

    #[test]
    fn test_admin_paths_are_not_cached_or_indexed() {
        for path in ["/admin/login", "/api/admin/protected"] {
            let headers = headers_for(path);
            assert_eq!(headers[CACHE_CONTROL], "no-store");
            assert_eq!(headers["x-robots-tag"], "noindex, nofollow");
        }
    }

    #[test]
    fn test_security_headers_leave_cors_alone() {
        let headers = headers_for("/api/health");
        assert!(headers.get("access-control-allow-origin").is_none());
        assert!(headers.get("vary").is_none());
    }

    #[test]
    fn test_applying_twice_matches_applying_once() {
        let policy = SecurityHeaders::from_config(&SecurityConfig::default());

        let mut once = HeaderMap::new();
        policy.apply(&mut once, "/api/admin/protected");

        let mut twice = once.clone();
        policy.apply(&mut twice, "/api/admin/protected");

        assert_eq!(once.len(), twice.len());
        for (name, value) in &once {
            let values: Vec<_> = twice.get_all(name).iter().collect();
            assert_eq!(values, vec![value], "header {} changed", name);
        }
    }
}
