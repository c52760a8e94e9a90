//! Administrative vault API handlers
//!
//! Destructive resets; every route requires the admin role.

use axum::{extract::State, Json};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::vault_service::{ResetOutcome, VaultError};

use super::AdminUser;

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

/// Delete all collector accounts
pub async fn purge_collectors(
    admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ResetOutcome>> {
    tracing::warn!(admin_id = %admin.0.user_id, "Vault purge of collectors requested");
    let outcome = app_state.vault_service.purge_collectors().await?;
    Ok(Json(outcome))
}

/// Delete all borrowers (loans and payments cascade)
pub async fn purge_borrowers(
    admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ResetOutcome>> {
    tracing::warn!(admin_id = %admin.0.user_id, "Vault purge of borrowers requested");
    let outcome = app_state.vault_service.purge_borrowers().await?;
    Ok(Json(outcome))
}

/// Wipe all loans and payment history
pub async fn reset_loans(
    admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ResetOutcome>> {
    tracing::warn!(admin_id = %admin.0.user_id, "Vault reset of loan book requested");
    let outcome = app_state.vault_service.reset_loans().await?;
    Ok(Json(outcome))
}
