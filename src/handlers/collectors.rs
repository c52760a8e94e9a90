//! Collector provisioning API handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::Profile;
use crate::provision_service::{CreateCollectorRequest, CreatedCollector, ProvisionError};
use crate::state::AppState;

use super::AdminUser;

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::EmailTaken => ApiError::Conflict(err.to_string()),
            ProvisionError::Hash(e) => ApiError::InternalError(e),
            ProvisionError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

/// Provision a new collector account
pub async fn create_collector(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Json(request): Json<CreateCollectorRequest>,
) -> ApiResult<Json<CreatedCollector>> {
    request.validate()?;

    let created = app_state.provision_service.create_collector(request).await?;
    Ok(Json(created))
}

/// List collector profiles
pub async fn list_collectors(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<Vec<Profile>>> {
    let collectors = app_state.provision_service.list_collectors().await?;
    Ok(Json(collectors))
}

/// List every system profile (admins and collectors)
pub async fn list_profiles(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<Vec<Profile>>> {
    let profiles = app_state.provision_service.list_profiles().await?;
    Ok(Json(profiles))
}
