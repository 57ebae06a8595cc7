//! Admin page shell and static assets

use crate::{
    guard::{CookieFlagStore, GuardOutcome, RouteGuard, LOGIN_PATH},
    templates::{AdminShellTemplate, LoginTemplate},
    AppState,
};
use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

const ADMIN_JS: &str = include_str!("../../static/admin.js");
const ADMIN_CSS: &str = include_str!("../../static/admin.css");

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render template: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn guarded_shell(state: &AppState, headers: &HeaderMap, section: &str) -> Response {
    let store = CookieFlagStore::new(headers, &state.config.session.flag_cookie_name);
    let mut guard = RouteGuard::new(LOGIN_PATH);

    match guard.mount(&store) {
        GuardOutcome::Render => render(AdminShellTemplate::new(section)),
        GuardOutcome::Redirect(to) => {
            debug!("No admin flag; redirecting /admin/{} to {}", section, to);
            Redirect::to(&to).into_response()
        }
    }
}

/// `GET /admin`
pub async fn admin_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    guarded_shell(&state, &headers, "")
}

/// `GET /admin/{*path}`
pub async fn admin_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    headers: HeaderMap,
) -> Response {
    guarded_shell(&state, &headers, &section)
}

/// `GET /admin/login`, always rendered
pub async fn admin_login(State(state): State<AppState>) -> Response {
    render(LoginTemplate::new(
        state.provider.name(),
        state.config.provider.firebase.as_ref(),
    ))
}

pub async fn admin_script() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/javascript; charset=utf-8")], ADMIN_JS)
}

pub async fn admin_stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], ADMIN_CSS)
}
