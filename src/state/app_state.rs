//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::AuthService;
use crate::borrower_service::BorrowerService;
use crate::export::ExportService;
use crate::ledger::LedgerService;
use crate::loan::LoanService;
use crate::plan::PlanService;
use crate::provision_service::ProvisionService;
use crate::services::ReportingService;
use crate::vault_service::VaultService;

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: Arc<AuthService>,
    pub borrower_service: Arc<BorrowerService>,
    pub plan_service: Arc<PlanService>,
    pub loan_service: Arc<LoanService>,
    pub ledger_service: Arc<LedgerService>,
    pub reporting_service: Arc<ReportingService>,
    pub export_service: Arc<ExportService>,
    pub provision_service: Arc<ProvisionService>,
    pub vault_service: Arc<VaultService>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: PgPool,
        auth_service: Arc<AuthService>,
        borrower_service: Arc<BorrowerService>,
        plan_service: Arc<PlanService>,
        loan_service: Arc<LoanService>,
        ledger_service: Arc<LedgerService>,
        reporting_service: Arc<ReportingService>,
        export_service: Arc<ExportService>,
        provision_service: Arc<ProvisionService>,
        vault_service: Arc<VaultService>,
    ) -> Self {
        Self {
            db_pool,
            auth_service,
            borrower_service,
            plan_service,
            loan_service,
            ledger_service,
            reporting_service,
            export_service,
            provision_service,
            vault_service,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<BorrowerService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.borrower_service.clone()
    }
}

impl FromRef<AppState> for Arc<PlanService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.plan_service.clone()
    }
}

impl FromRef<AppState> for Arc<LoanService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.loan_service.clone()
    }
}

impl FromRef<AppState> for Arc<LedgerService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger_service.clone()
    }
}

impl FromRef<AppState> for Arc<ReportingService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.reporting_service.clone()
    }
}
