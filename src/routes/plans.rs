//! Loan plan route definitions

use axum::{routing::get, routing::delete, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/plans", get(list_plans).post(create_plan))
        .route("/api/plans/:id", delete(delete_plan))
}
