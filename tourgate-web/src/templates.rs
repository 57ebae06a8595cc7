//! Server-rendered admin pages
//!
//! Pages carry no inline script; behaviour lives in `/static/admin.js` so the
//! page CSP can stay strict.

use askama::Template;

/// Admin dashboard shell
#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminShellTemplate {
    pub title: String,
    /// Path below `/admin` the client-side router should open
    pub section: String,
    pub version: String,
}

/// Admin login view
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub provider: String,
    pub firebase_project_id: Option<String>,
    pub firebase_api_key: Option<String>,
    pub firebase_app_id: Option<String>,
}

impl AdminShellTemplate {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            title: "Tour Admin".to_string(),
            section: section.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl LoginTemplate {
    pub fn new(provider: &str, firebase: Option<&tourgate_core::FirebaseSettings>) -> Self {
        Self {
            title: "Sign in - Tour Admin".to_string(),
            provider: provider.to_string(),
            firebase_project_id: firebase.map(|f| f.project_id.clone()),
            firebase_api_key: firebase.and_then(|f| f.api_key.clone()),
            firebase_app_id: firebase.and_then(|f| f.app_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_shell_renders_section() {
        let html = AdminShellTemplate::new("bookings").render().unwrap();
        assert!(html.contains("data-section=\"bookings\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_login_escapes_config_values() {
        let settings = tourgate_core::FirebaseSettings {
            project_id: "tours\"><b>".to_string(),
            api_key: None,
            app_id: None,
            admin_token: Some("never-rendered".to_string()),
        };
        let html = LoginTemplate::new("firebase", Some(&settings)).render().unwrap();
        assert!(!html.contains("tours\"><b>"));
        assert!(!html.contains("never-rendered"));
    }
}
