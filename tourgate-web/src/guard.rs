//! Admin route guard
//!
//! A UX gate in front of the admin pages. It only looks at the `admin_auth`
//! flag; the API endpoints still authenticate every request on their own.

use crate::cookies::get_cookie;
use axum::http::HeaderMap;

/// Where unauthenticated visitors are sent
pub const LOGIN_PATH: &str = "/admin/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// What the caller should do after mounting the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    Redirect(String),
}

/// Source of the auth flag
pub trait AuthFlagStore {
    fn has_auth_flag(&self) -> bool;
}

/// Reads the flag from the request's cookies
#[derive(Debug)]
pub struct CookieFlagStore<'a> {
    headers: &'a HeaderMap,
    cookie_name: &'a str,
}

impl<'a> CookieFlagStore<'a> {
    pub fn new(headers: &'a HeaderMap, cookie_name: &'a str) -> Self {
        Self {
            headers,
            cookie_name,
        }
    }
}

impl AuthFlagStore for CookieFlagStore<'_> {
    fn has_auth_flag(&self) -> bool {
        get_cookie(self.headers, self.cookie_name).as_deref() == Some("true")
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    state: GuardState,
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            state: GuardState::Loading,
            login_path: login_path.into(),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Resolve the guard. Only the first mount reads the store; later
    /// mounts repeat the settled outcome.
    pub fn mount(&mut self, store: &dyn AuthFlagStore) -> GuardOutcome {
        if self.state == GuardState::Loading {
            self.state = if store.has_auth_flag() {
                GuardState::Authenticated
            } else {
                GuardState::Unauthenticated
            };
        }

        match self.state {
            GuardState::Authenticated => GuardOutcome::Render,
            _ => GuardOutcome::Redirect(self.login_path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    struct Flag(bool);

    impl AuthFlagStore for Flag {
        fn has_auth_flag(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_starts_loading() {
        assert_eq!(RouteGuard::default().state(), GuardState::Loading);
    }

    #[test]
    fn test_absent_flag_redirects_to_login() {
        let mut guard = RouteGuard::default();
        assert_eq!(
            guard.mount(&Flag(false)),
            GuardOutcome::Redirect(LOGIN_PATH.to_string())
        );
        assert_eq!(guard.state(), GuardState::Unauthenticated);
    }

    #[test]
    fn test_present_flag_renders() {
        let mut guard = RouteGuard::default();
        assert_eq!(guard.mount(&Flag(true)), GuardOutcome::Render);
        assert_eq!(guard.state(), GuardState::Authenticated);
    }

    #[test]
    fn test_settled_guard_ignores_later_mounts() {
        let mut guard = RouteGuard::default();
        guard.mount(&Flag(false));
        assert_eq!(
            guard.mount(&Flag(true)),
            GuardOutcome::Redirect(LOGIN_PATH.to_string())
        );
        assert_eq!(guard.state(), GuardState::Unauthenticated);
    }

    #[test]
    fn test_cookie_store_requires_true() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("admin_auth=true"));
        assert!(CookieFlagStore::new(&headers, "admin_auth").has_auth_flag());

        headers.insert(COOKIE, HeaderValue::from_static("admin_auth=false"));
        assert!(!CookieFlagStore::new(&headers, "admin_auth").has_auth_flag());

        assert!(!CookieFlagStore::new(&HeaderMap::new(), "admin_auth").has_auth_flag());
    }
}
