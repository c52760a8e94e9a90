//! Reporting route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports/summary", get(report_summary))
        .route("/api/reports/monthly", get(monthly_summary))
        .route("/api/reports/portfolio", get(portfolio_health))
        .route("/api/reports/arrears", get(arrears))
}
