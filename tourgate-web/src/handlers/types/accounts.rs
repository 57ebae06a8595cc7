//! Account creation and provider probe types

use crate::auth::provider::{CreatedAccount, ProviderStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body of `POST /api/create-admin`
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    #[schema(example = "new-admin@example.com")]
    pub email: String,
    #[schema(example = "a-long-password")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateAdminResponse {
    pub success: bool,
    pub message: String,
    pub account: CreatedAccount,
}

/// Result of probing the identity provider
#[derive(Serialize, ToSchema)]
pub struct ProviderProbeResponse {
    pub success: bool,
    pub message: String,
    pub status: ProviderStatus,
}
