//! Collector provisioning route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn collector_routes() -> Router<AppState> {
    Router::new()
        .route("/api/collectors", get(list_collectors).post(create_collector))
        .route("/api/profiles", get(list_profiles))
}
