//! Reporting API handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::UserRole;
use crate::services::reporting::{
    ArrearsRow, CollectionMetrics, MonthlySummary, PortfolioHealth,
};
use crate::state::AppState;

use super::{AdminUser, AuthenticatedUser};

/// Optional collector scope for the summary metrics
#[derive(Debug, Deserialize, Default)]
pub struct ReportScope {
    pub collector_id: Option<Uuid>,
}

/// Dashboard KPI metrics
///
/// Admins may scope to any collector; a collector's token is always scoped
/// to its own portfolio.
pub async fn report_summary(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> ApiResult<Json<CollectionMetrics>> {
    let collector_id = match user.role {
        UserRole::Admin => scope.collector_id,
        UserRole::Collector => Some(user.user_id),
    };

    let metrics = app_state.reporting_service.metrics(collector_id).await?;
    Ok(Json(metrics))
}

/// Current month's collection summary
pub async fn monthly_summary(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<MonthlySummary>> {
    let summary = app_state.reporting_service.monthly_summary().await?;
    Ok(Json(summary))
}

/// Active-loan portfolio health
pub async fn portfolio_health(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<PortfolioHealth>> {
    let health = app_state.reporting_service.portfolio_health().await?;
    Ok(Json(health))
}

/// Loans behind their installment schedule
pub async fn arrears(
    _admin: AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<Vec<ArrearsRow>>> {
    let rows = app_state.reporting_service.arrears().await?;
    Ok(Json(rows))
}
