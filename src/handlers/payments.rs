//! Payment collection API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::ledger::{LedgerError, LoanProgress, Payment, PaymentReceipt, RecordPaymentRequest};
use crate::loan::LoanSummaryRow;
use crate::state::AppState;

use super::{AuthenticatedUser, CollectorUser};

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::LoanNotFound => ApiError::NotFound(err.to_string()),
            LedgerError::LoanNotActive | LedgerError::DuplicateInstallment => {
                ApiError::Conflict(err.to_string())
            }
            LedgerError::ScheduleComplete => ApiError::UnprocessableEntity(err.to_string()),
            LedgerError::InvalidAmount => ApiError::ValidationError(err.to_string()),
            LedgerError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

/// The collector's collection view for one borrower: the active loan and its
/// repayment progress
#[derive(Debug, Serialize)]
pub struct ActiveLoanResponse {
    pub loan: LoanSummaryRow,
    pub progress: LoanProgress,
    pub next_installment_amount: i64,
}

/// Record a collected installment against a loan
pub async fn record_payment(
    collector: CollectorUser,
    State(app_state): State<AppState>,
    Json(request): Json<RecordPaymentRequest>,
) -> ApiResult<Json<PaymentReceipt>> {
    let receipt = app_state
        .ledger_service
        .record_payment(request, Some(collector.0.user_id))
        .await?;

    Ok(Json(receipt))
}

/// List payments recorded against a loan, in installment order
pub async fn list_loan_payments(
    _user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Payment>>> {
    let payments = app_state.ledger_service.payments_for_loan(&loan_id).await?;
    Ok(Json(payments))
}

/// The borrower's active loan with repayment progress, for the collection
/// screen
pub async fn borrower_active_loan(
    _collector: CollectorUser,
    State(app_state): State<AppState>,
    Path(borrower_id): Path<Uuid>,
) -> ApiResult<Json<ActiveLoanResponse>> {
    let loan = app_state
        .loan_service
        .active_loan_for_borrower(&borrower_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No active loan found for this borrower".to_string())
        })?;

    let progress = app_state.ledger_service.progress(&loan.id).await?;

    Ok(Json(ActiveLoanResponse {
        next_installment_amount: loan.installment_amount,
        loan,
        progress,
    }))
}
