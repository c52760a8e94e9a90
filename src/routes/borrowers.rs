//! Borrower route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn borrower_routes() -> Router<AppState> {
    Router::new()
        .route("/api/borrowers", get(list_borrowers).post(register_borrower))
        .route("/api/borrowers/:id", get(get_borrower))
        .route("/api/borrowers/:id/status", put(update_borrower_status))
        .route("/api/borrowers/:id/collector", put(assign_collector))
        // Collector-facing views
        .route("/api/collector/borrowers", get(my_borrowers))
        .route(
            "/api/collector/borrowers/:id/active-loan",
            get(borrower_active_loan),
        )
}
