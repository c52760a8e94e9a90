//! Administrative vault - destructive reset operations
//!
//! The escape hatches behind the dashboard's danger zone: purge collector
//! accounts, purge the borrower registry, or wipe the loan book. Each
//! operation is admin-gated at the route layer and runs in its own
//! transaction. This service is constructed separately from the regular
//! services and handed only to the vault routes, so destructive access never
//! rides along with day-to-day handlers.

use sqlx::PgPool;
use thiserror::Error;

/// Vault errors
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a reset operation
#[derive(Debug, serde::Serialize)]
pub struct ResetOutcome {
    pub deleted: u64,
    pub message: String,
}

/// Vault service for destructive administrative resets
#[derive(Clone)]
pub struct VaultService {
    db_pool: PgPool,
}

impl VaultService {
    /// Create a new vault service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Delete every collector account and its profile
    ///
    /// Borrower assignments and payment collector references are released to
    /// NULL by the schema, not orphaned.
    pub async fn purge_collectors(&self) -> Result<ResetOutcome, VaultError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id IN (SELECT id FROM profiles WHERE role = 'collector')",
        )
        .execute(&self.db_pool)
        .await?;

        let deleted = result.rows_affected();
        tracing::warn!(deleted, "Vault: purged collector accounts");

        Ok(ResetOutcome {
            deleted,
            message: format!("Deleted {} collectors.", deleted),
        })
    }

    /// Delete every borrower; loans and payments under them cascade
    pub async fn purge_borrowers(&self) -> Result<ResetOutcome, VaultError> {
        let result = sqlx::query("DELETE FROM borrowers")
            .execute(&self.db_pool)
            .await?;

        let deleted = result.rows_affected();
        tracing::warn!(deleted, "Vault: purged borrower registry");

        Ok(ResetOutcome {
            deleted,
            message: format!("Deleted {} borrowers.", deleted),
        })
    }

    /// Wipe all loans and payment history; borrowers and plans survive
    pub async fn reset_loans(&self) -> Result<ResetOutcome, VaultError> {
        let mut tx = self.db_pool.begin().await?;

        // Payments first, then loans
        sqlx::query("DELETE FROM payments").execute(&mut *tx).await?;
        let result = sqlx::query("DELETE FROM loans").execute(&mut *tx).await?;

        tx.commit().await?;

        let deleted = result.rows_affected();
        tracing::warn!(deleted, "Vault: reset loan book and payment history");

        Ok(ResetOutcome {
            deleted,
            message: "All loans and payments reset.".to_string(),
        })
    }
}
