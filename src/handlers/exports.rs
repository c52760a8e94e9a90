//! CSV export API handlers

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use crate::error::{ApiError, ApiResult};
use crate::export::CsvExport;
use crate::state::AppState;

use super::AdminUser;

/// Export the borrower registry as CSV
pub async fn export_borrowers(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Response> {
    let export = app_state.export_service.borrowers_csv().await?;
    csv_response(export)
}

/// Export the loan portfolio as CSV
pub async fn export_loans(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Response> {
    let export = app_state.export_service.loans_csv().await?;
    csv_response(export)
}

/// Export the payment history as CSV
pub async fn export_payments(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Response> {
    let export = app_state.export_service.payments_csv().await?;
    csv_response(export)
}

/// Serve a rendered export as a CSV attachment
fn csv_response(export: CsvExport) -> ApiResult<Response> {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/csv; charset=utf-8"),
        )
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(export.content.into())
        .map_err(|e| ApiError::InternalError(e.to_string()))
}
