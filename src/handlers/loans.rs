//! Loan API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::ledger::{LoanProgress, ScheduleEntry};
use crate::loan::{IssueLoanRequest, ListLoansQuery, Loan, LoanServiceError, LoanSummaryRow};
use crate::state::AppState;

use super::{AdminUser, AuthenticatedUser};

impl From<LoanServiceError> for ApiError {
    fn from(err: LoanServiceError) -> Self {
        match err {
            LoanServiceError::BorrowerNotFound
            | LoanServiceError::PlanNotFound
            | LoanServiceError::LoanNotFound => ApiError::NotFound(err.to_string()),
            LoanServiceError::BorrowerInactive => ApiError::UnprocessableEntity(err.to_string()),
            LoanServiceError::Policy(e) => ApiError::UnprocessableEntity(e.to_string()),
            LoanServiceError::NotActive => ApiError::Conflict(err.to_string()),
            LoanServiceError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

/// Loan detail response: the loan with its derived repayment schedule
#[derive(Debug, Serialize)]
pub struct LoanDetailsResponse {
    pub loan: LoanSummaryRow,
    pub progress: LoanProgress,
    pub schedule: Vec<ScheduleEntry>,
}

/// Issue a new loan (policy-checked)
pub async fn issue_loan(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Json(request): Json<IssueLoanRequest>,
) -> ApiResult<Json<Loan>> {
    let loan = app_state.loan_service.issue(request).await?;
    Ok(Json(loan))
}

/// List loans with optional borrower and status filters
pub async fn list_loans(
    _user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(query): Query<ListLoansQuery>,
) -> ApiResult<Json<Vec<LoanSummaryRow>>> {
    let loans = app_state.loan_service.list(query).await?;
    Ok(Json(loans))
}

/// Get a loan with borrower/plan context and its repayment schedule
pub async fn get_loan(
    _user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LoanDetailsResponse>> {
    let summary = app_state
        .loan_service
        .get_summary(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loan not found".to_string()))?;

    let loan = app_state
        .loan_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loan not found".to_string()))?;

    let schedule = app_state.ledger_service.schedule_for_loan(&loan).await?;
    let progress = app_state.ledger_service.progress(&id).await?;

    Ok(Json(LoanDetailsResponse {
        loan: summary,
        progress,
        schedule,
    }))
}

/// Administrative transition: mark an active loan as defaulted
pub async fn mark_loan_defaulted(
    _admin: AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Loan>> {
    let loan = app_state.loan_service.mark_defaulted(&id).await?;
    Ok(Json(loan))
}
