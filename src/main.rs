//! Stratos Backend Server
//!
//! Loan-collection management backend for a microfinance operation: borrower
//! registry, loan plans and issuance, installment collection by field
//! collectors, and read-side reporting.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use stratos_server::auth::AuthService;
use stratos_server::borrower_service::BorrowerService;
use stratos_server::config::Config;
use stratos_server::export::ExportService;
use stratos_server::ledger::LedgerService;
use stratos_server::loan::LoanService;
use stratos_server::plan::PlanService;
use stratos_server::provision_service::ProvisionService;
use stratos_server::services::ReportingService;
use stratos_server::state::AppState;
use stratos_server::vault_service::VaultService;
use stratos_server::{db, jobs, middleware, routes};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    // Initialize database connection pool and schema
    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    // Initialize services
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        config.jwt_secret.clone(),
        config.jwt_access_token_ttl_seconds,
        config.jwt_refresh_token_ttl_days,
    ));
    let borrower_service = Arc::new(BorrowerService::new(db_pool.clone()));
    let plan_service = Arc::new(PlanService::new(db_pool.clone()));
    let loan_service = Arc::new(LoanService::new(db_pool.clone()));
    let ledger_service = Arc::new(LedgerService::new(db_pool.clone()));
    let reporting_service = Arc::new(ReportingService::new(db_pool.clone()));
    let export_service = Arc::new(ExportService::new(db_pool.clone()));
    let provision_service = Arc::new(ProvisionService::new(db_pool.clone()));

    // The vault service is constructed here and handed only to the vault
    // routes via state; destructive access is never ambient.
    let vault_service = Arc::new(VaultService::new(db_pool.clone()));

    // Create shared app state
    let app_state = AppState::new(
        db_pool.clone(),
        auth_service,
        borrower_service,
        plan_service,
        loan_service,
        ledger_service,
        reporting_service,
        export_service,
        provision_service,
        vault_service,
    );

    // Start the ledger reconciliation job
    let _scheduler = match jobs::start_scheduler(db_pool.clone(), &config.reconciliation_schedule)
        .await
    {
        Ok(scheduler) => Some(scheduler),
        Err(e) => {
            tracing::error!("Failed to start reconciliation scheduler: {}", e);
            None
        }
    };

    // Clone db_pool for health check
    let health_db_pool = db_pool.clone();

    // Create the app router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_db_pool.clone())))
        .merge(routes::auth_routes())
        .merge(routes::borrower_routes())
        .merge(routes::plan_routes())
        .merge(routes::loan_routes())
        .merge(routes::payment_routes())
        .merge(routes::report_routes())
        .merge(routes::export_routes())
        .merge(routes::collector_routes())
        .merge(routes::vault_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(&config));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Serve with graceful shutdown
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    tracing::info!("Server shutdown complete");
}

async fn root() -> &'static str {
    "Stratos API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let db_status = match db::check_health(&pool).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let allowed_origins_str = config.cors_allowed_origins.clone().unwrap_or_default();

    if allowed_origins_str.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
