//! Loan service layer - Issuance and lifecycle transitions

use chrono::{Months, NaiveDate, Utc};
use sqlx::{PgPool, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::borrower::{Borrower, BorrowerStatus};
use crate::plan::LoanPlan;

use super::model::{IssueLoanRequest, ListLoansQuery, Loan, LoanStatus, LoanSummaryRow};
use super::policy::{check_issuance, IssuanceError};

/// Loan service errors
#[derive(Error, Debug)]
pub enum LoanServiceError {
    #[error("Borrower not found")]
    BorrowerNotFound,

    #[error("Borrower is inactive")]
    BorrowerInactive,

    #[error("Loan plan not found")]
    PlanNotFound,

    #[error("Loan not found")]
    LoanNotFound,

    #[error("Loan is not active")]
    NotActive,

    #[error(transparent)]
    Policy(#[from] IssuanceError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Loan counts used by the issuance policy
#[derive(Debug, sqlx::FromRow)]
struct BorrowerLoanCounts {
    total_loans: Option<i64>,
    active_loans: Option<i64>,
}

/// Loan service for issuance and lifecycle management
#[derive(Clone)]
pub struct LoanService {
    db_pool: PgPool,
}

impl LoanService {
    /// Create a new loan service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Issue a new loan to a borrower under a plan
    ///
    /// Runs the policy checks and the insert inside one transaction. The
    /// partial unique index on active loans per borrower backs the
    /// exclusivity rule against concurrent issuers; a violation surfaces as
    /// the same policy error as the pre-check.
    pub async fn issue(&self, request: IssueLoanRequest) -> Result<Loan, LoanServiceError> {
        let mut tx = self.db_pool.begin().await?;

        let borrower =
            sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers WHERE id = $1 FOR UPDATE")
                .bind(request.borrower_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(LoanServiceError::BorrowerNotFound)?;

        if borrower.status != BorrowerStatus::Active {
            return Err(LoanServiceError::BorrowerInactive);
        }

        let plan = sqlx::query_as::<_, LoanPlan>("SELECT * FROM loan_plans WHERE id = $1")
            .bind(request.plan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(LoanServiceError::PlanNotFound)?;

        let counts = sqlx::query_as::<_, BorrowerLoanCounts>(
            r#"
            SELECT
                COUNT(*) as total_loans,
                COUNT(*) FILTER (WHERE status = 'active') as active_loans
            FROM loans
            WHERE borrower_id = $1
            "#,
        )
        .bind(request.borrower_id)
        .fetch_one(&mut *tx)
        .await?;

        check_issuance(
            counts.total_loans.unwrap_or(0),
            counts.active_loans.unwrap_or(0),
            plan.principal_amount,
        )?;

        let start_date = Utc::now().date_naive();
        let end_date = add_months(start_date, plan.duration_months);

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (
                id, borrower_id, plan_id, principal_amount, installment_amount,
                start_date, end_date, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.borrower_id)
        .bind(request.plan_id)
        .bind(plan.principal_amount)
        .bind(plan.installment_amount)
        .bind(start_date)
        .bind(end_date)
        .bind(LoanStatus::Active)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LoanServiceError::Policy(IssuanceError::ActiveLoanExists)
            }
            _ => LoanServiceError::Database(e),
        })?;

        tx.commit().await?;

        tracing::info!(
            loan_id = %loan.id,
            borrower_id = %loan.borrower_id,
            principal = loan.principal_amount,
            "Loan issued"
        );

        Ok(loan)
    }

    /// Get a loan by ID
    pub async fn get(&self, id: &Uuid) -> Result<Option<Loan>, LoanServiceError> {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(loan)
    }

    /// Get a loan joined with its borrower and plan
    pub async fn get_summary(&self, id: &Uuid) -> Result<Option<LoanSummaryRow>, LoanServiceError> {
        let row = sqlx::query_as::<_, LoanSummaryRow>(
            r#"
            SELECT
                l.id, l.borrower_id, b.full_name AS borrower_name,
                l.plan_id, p.name AS plan_name, p.duration_months,
                l.principal_amount, l.installment_amount,
                l.start_date, l.end_date, l.status
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE l.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(row)
    }

    /// List loans with optional borrower and status filters
    pub async fn list(&self, query: ListLoansQuery) -> Result<Vec<LoanSummaryRow>, LoanServiceError> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT
                l.id, l.borrower_id, b.full_name AS borrower_name,
                l.plan_id, p.name AS plan_name, p.duration_months,
                l.principal_amount, l.installment_amount,
                l.start_date, l.end_date, l.status
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE 1=1
            "#,
        );

        if let Some(borrower_id) = query.borrower_id {
            builder.push(" AND l.borrower_id = ");
            builder.push_bind(borrower_id);
        }
        if let Some(status) = query.status {
            builder.push(" AND l.status = ");
            builder.push_bind(status);
        }

        builder.push(" ORDER BY l.created_at DESC");

        let loans = builder
            .build_query_as::<LoanSummaryRow>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(loans)
    }

    /// Get the borrower's current active loan, if any
    pub async fn active_loan_for_borrower(
        &self,
        borrower_id: &Uuid,
    ) -> Result<Option<LoanSummaryRow>, LoanServiceError> {
        let row = sqlx::query_as::<_, LoanSummaryRow>(
            r#"
            SELECT
                l.id, l.borrower_id, b.full_name AS borrower_name,
                l.plan_id, p.name AS plan_name, p.duration_months,
                l.principal_amount, l.installment_amount,
                l.start_date, l.end_date, l.status
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE l.borrower_id = $1 AND l.status = 'active'
            "#,
        )
        .bind(borrower_id)
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(row)
    }

    /// Administrative transition: mark an active loan as defaulted
    pub async fn mark_defaulted(&self, id: &Uuid) -> Result<Loan, LoanServiceError> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = 'defaulted', updated_at = $1
            WHERE id = $2 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        match loan {
            Some(loan) => {
                tracing::warn!(loan_id = %loan.id, "Loan marked defaulted");
                Ok(loan)
            }
            None => {
                // Distinguish a missing loan from a terminal one
                let exists = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.db_pool)
                    .await?;
                match exists {
                    Some(_) => Err(LoanServiceError::NotActive),
                    None => Err(LoanServiceError::LoanNotFound),
                }
            }
        }
    }
}

/// Add calendar months to a date, saturating at the calendar boundary
pub(crate) fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    date.checked_add_months(Months::new(months.max(0) as u32))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_months_end_date() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            add_months(start, 12),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            add_months(start, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
