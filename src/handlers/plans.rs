//! Loan plan API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::plan::{CreatePlanRequest, LoanPlan, PlanError};
use crate::state::AppState;

use super::{AdminUser, AuthenticatedUser};

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NotFound => ApiError::NotFound("Plan not found".to_string()),
            PlanError::InUse => ApiError::Conflict(err.to_string()),
            PlanError::Calculator(e) => ApiError::ValidationError(e.to_string()),
            PlanError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

/// Create a loan plan; the installment amount is derived server-side
pub async fn create_plan(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Json(request): Json<CreatePlanRequest>,
) -> ApiResult<Json<LoanPlan>> {
    request.validate()?;

    let plan = app_state.plan_service.create(request).await?;
    Ok(Json(plan))
}

/// List loan plans
pub async fn list_plans(
    _user: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<Vec<LoanPlan>>> {
    let plans = app_state.plan_service.list().await?;
    Ok(Json(plans))
}

/// Delete an unreferenced loan plan
pub async fn delete_plan(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    app_state.plan_service.delete(&id).await?;
    Ok(Json(serde_json::json!({ "message": "Plan deleted" })))
}
