//! Administrative vault route definitions

use axum::{routing::delete, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn vault_routes() -> Router<AppState> {
    Router::new()
        .route("/api/vault/collectors", delete(purge_collectors))
        .route("/api/vault/borrowers", delete(purge_borrowers))
        .route("/api/vault/loans", delete(reset_loans))
}
