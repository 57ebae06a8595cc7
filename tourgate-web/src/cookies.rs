//! Cookie parsing and `Set-Cookie` construction

use axum::http::{header::COOKIE, HeaderMap};
use tourgate_core::{SameSite, SessionSettings};

/// Find a cookie value by name across all `Cookie` headers
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Attributes for one `Set-Cookie` header
#[derive(Debug, Clone)]
pub struct CookieSpec<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub max_age_seconds: i64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieSpec<'_> {
    pub fn to_header_value(&self) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; SameSite={}",
            self.name,
            self.value,
            self.max_age_seconds.max(0),
            self.same_site.as_str()
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// `Set-Cookie` for the session credential
pub fn session_cookie(settings: &SessionSettings, credential: &str) -> String {
    CookieSpec {
        name: &settings.cookie_name,
        value: credential,
        max_age_seconds: settings.max_age_seconds,
        http_only: settings.http_only,
        secure: settings.secure,
        same_site: settings.same_site,
    }
    .to_header_value()
}

/// `Set-Cookie` for the UX auth flag; readable by scripts on purpose
pub fn flag_cookie(settings: &SessionSettings) -> String {
    CookieSpec {
        name: &settings.flag_cookie_name,
        value: "true",
        max_age_seconds: settings.max_age_seconds,
        http_only: false,
        secure: settings.secure,
        same_site: settings.same_site,
    }
    .to_header_value()
}

/// `Set-Cookie` that removes a cookie
pub fn expired_cookie(name: &str, secure: bool, same_site: SameSite) -> String {
    CookieSpec {
        name,
        value: "",
        max_age_seconds: 0,
        http_only: false,
        secure,
        same_site,
    }
    .to_header_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_get_cookie_finds_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; __session=abc.def.ghi; lang=en"),
        );

        assert_eq!(
            get_cookie(&headers, "__session").as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_get_cookie_searches_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("admin_auth=true"));

        assert_eq!(get_cookie(&headers, "admin_auth").as_deref(), Some("true"));
    }

    #[test]
    fn test_empty_cookie_value_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("__session="));
        assert_eq!(get_cookie(&headers, "__session"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let settings = tourgate_core::SecurityConfig::default().session;
        let cookie = session_cookie(&settings, "token");
        assert!(cookie.starts_with("__session=token; Path=/; Max-Age=432000"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));

        let flag = flag_cookie(&settings);
        assert!(flag.starts_with("admin_auth=true"));
        assert!(!flag.contains("HttpOnly"));
    }

    #[test]
    fn test_expired_cookie_has_zero_max_age() {
        let cookie = expired_cookie("__session", false, SameSite::Strict);
        assert_eq!(cookie, "__session=; Path=/; Max-Age=0; SameSite=Strict");
    }
}
