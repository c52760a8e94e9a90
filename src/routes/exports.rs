//! CSV export route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/api/exports/borrowers", get(export_borrowers))
        .route("/api/exports/loans", get(export_loans))
        .route("/api/exports/payments", get(export_payments))
}
