//! Route definitions for the Stratos API

mod auth;
mod borrowers;
mod collectors;
mod exports;
mod loans;
mod payments;
mod plans;
mod reports;
mod vault;

pub use auth::auth_routes;
pub use borrowers::borrower_routes;
pub use collectors::collector_routes;
pub use exports::export_routes;
pub use loans::loan_routes;
pub use payments::payment_routes;
pub use plans::plan_routes;
pub use reports::report_routes;
pub use vault::vault_routes;
