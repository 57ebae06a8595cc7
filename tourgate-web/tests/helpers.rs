//! Integration test helpers
//!
//! Spawns the full application on a random port and drives it over HTTP.

#![allow(dead_code)]

use std::sync::LazyLock;
use tokio::net::TcpListener;
use tourgate_core::{Role, SecurityConfig};
use tourgate_web::AppState;

// Initialise tracing only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

pub const TEST_ORIGIN: &str = "https://admin.tours.example";

/// Security configuration used by the tests
pub fn test_config() -> SecurityConfig {
    let lookup = |key: &str| -> Option<String> {
        match key {
            "JWT_SECRET" => Some("integration-test-secret-0123456789abcdef".to_string()),
            "ALLOWED_ORIGINS" => Some(format!("{},http://localhost:3000", TEST_ORIGIN)),
            "SESSION_COOKIE_SECURE" => Some("false".to_string()),
            "AUTH_PROVIDER" => Some("jwt".to_string()),
            _ => None,
        }
    };
    SecurityConfig::from_lookup(lookup).expect("test config is valid")
}

/// Running test application
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub state: AppState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Sign a credential the application will accept
    pub fn token(&self, role: Role) -> String {
        self.state
            .tokens
            .issue_access_token(
                &format!("{}-1", role),
                &format!("{}@tours.example", role),
                Some(role),
            )
            .expect("token signs")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_auth<Body>(
        &self,
        path: &str,
        token: &str,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Fetch a CSRF token; returns the token as both cookie and header value
    pub async fn csrf_token(&self) -> String {
        let response = self.get("/api/csrf-token").await;
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.expect("csrf body");
        body["csrfToken"]
            .as_str()
            .expect("csrfToken field")
            .to_string()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: SecurityConfig) -> TestApp {
    spawn_app_with_state(AppState::new(config).expect("state builds")).await
}

/// Spawn with hand-built components, e.g. a provider pointed at a dead endpoint
pub async fn spawn_app_with_state(state: AppState) -> TestApp {
    LazyLock::force(&TRACING);

    let app = tourgate_web::create_app(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: client,
        state,
    }
}

/// Router without a listener, for `oneshot` tests
pub fn router() -> (axum::Router, AppState) {
    LazyLock::force(&TRACING);
    let state = AppState::new(test_config()).expect("state builds");
    (tourgate_web::create_app(state.clone()), state)
}
