//! Borrower registry API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::borrower::{
    AssignCollectorRequest, Borrower, ListBorrowersQuery, RegisterBorrowerRequest,
    UpdateBorrowerStatusRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::{AdminUser, AuthenticatedUser, CollectorUser};

/// Register a new borrower
pub async fn register_borrower(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Json(request): Json<RegisterBorrowerRequest>,
) -> ApiResult<Json<Borrower>> {
    request.validate()?;

    let borrower = app_state.borrower_service.register(request).await?;
    Ok(Json(borrower))
}

/// List borrowers with optional status/collector filters and text search
pub async fn list_borrowers(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Query(query): Query<ListBorrowersQuery>,
) -> ApiResult<Json<Vec<Borrower>>> {
    let borrowers = app_state.borrower_service.list(query).await?;
    Ok(Json(borrowers))
}

/// Get a single borrower by ID
pub async fn get_borrower(
    _user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Borrower>> {
    let borrower = app_state
        .borrower_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Borrower not found".to_string()))?;
    Ok(Json(borrower))
}

/// Change a borrower's status
pub async fn update_borrower_status(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBorrowerStatusRequest>,
) -> ApiResult<Json<Borrower>> {
    let borrower = app_state
        .borrower_service
        .update_status(&id, request.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Borrower not found".to_string()))?;
    Ok(Json(borrower))
}

/// Assign or unassign the borrower's field collector
pub async fn assign_collector(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignCollectorRequest>,
) -> ApiResult<Json<Borrower>> {
    let borrower = app_state
        .borrower_service
        .assign_collector(&id, request.collector_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Borrower not found".to_string()))?;
    Ok(Json(borrower))
}

/// Active borrowers assigned to the calling collector
pub async fn my_borrowers(
    collector: CollectorUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<Vec<Borrower>>> {
    let borrowers = app_state
        .borrower_service
        .list_for_collector(&collector.0.user_id)
        .await?;
    Ok(Json(borrowers))
}
