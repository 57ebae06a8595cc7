//! Identity provider diagnostics

use super::types::{ErrorResponse, ProviderProbeResponse};
use crate::{auth::AuthError, AppState};
use axum::{extract::State, response::Json};
use tracing::info;

/// Probe the configured identity provider
#[utoipa::path(
    get,
    path = "/api/test-firebase",
    tag = "Diagnostics",
    summary = "Identity provider probe",
    description = "Checks that the identity provider is configured and its signing keys can be fetched",
    responses(
        (status = 200, description = "Provider reachable", body = ProviderProbeResponse),
        (status = 500, description = "Provider unavailable or misconfigured", body = ErrorResponse)
    )
)]
pub async fn test_firebase(
    State(state): State<AppState>,
) -> Result<Json<ProviderProbeResponse>, AuthError> {
    let status = state.provider.probe().await?;
    info!(
        "{} provider reachable with {} signing keys",
        status.provider, status.signing_keys
    );

    Ok(Json(ProviderProbeResponse {
        success: true,
        message: format!("{} provider is reachable", status.provider),
        status,
    }))
}
