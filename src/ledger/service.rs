//! Ledger service layer - Payment recording and schedule queries

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::loan::{Loan, LoanStatus};

use super::model::{
    LoanProgress, Payment, PaymentReceipt, RecordPaymentRequest, ScheduleEntry,
};
use super::schedule::build_schedule;

/// Ledger service errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Loan not found")]
    LoanNotFound,

    #[error("Loan is not active")]
    LoanNotActive,

    #[error("All installments for this loan have already been collected")]
    ScheduleComplete,

    #[error("Installment number was already recorded for this loan")]
    DuplicateInstallment,

    #[error("Payment amount must be positive")]
    InvalidAmount,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Loan row with the plan duration needed for ledger decisions
#[derive(Debug, sqlx::FromRow)]
struct LoanWithDuration {
    id: Uuid,
    installment_amount: i64,
    status: LoanStatus,
    duration_months: i32,
}

/// Ledger service for recording payments and deriving schedules
#[derive(Clone)]
pub struct LedgerService {
    db_pool: PgPool,
}

impl LedgerService {
    /// Create a new ledger service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Record a collected installment against an active loan
    ///
    /// The loan row is locked for the duration of the transaction so two
    /// collectors racing on the same loan serialize; the unique constraint on
    /// (loan_id, installment_number) is the storage-level backstop. When the
    /// final installment lands, the loan flips to completed in the same
    /// transaction, so a payment can never be recorded without its
    /// completion transition.
    pub async fn record_payment(
        &self,
        request: RecordPaymentRequest,
        collector_id: Option<Uuid>,
    ) -> Result<PaymentReceipt, LedgerError> {
        let mut tx = self.db_pool.begin().await?;

        let loan = sqlx::query_as::<_, LoanWithDuration>(
            r#"
            SELECT l.id, l.installment_amount, l.status, p.duration_months
            FROM loans l
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE l.id = $1
            FOR UPDATE OF l
            "#,
        )
        .bind(request.loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LedgerError::LoanNotFound)?;

        if loan.status != LoanStatus::Active {
            return Err(LedgerError::LoanNotActive);
        }

        let (paid_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM payments WHERE loan_id = $1")
                .bind(loan.id)
                .fetch_one(&mut *tx)
                .await?;

        let progress = LoanProgress::new(paid_count, loan.duration_months);
        if progress.is_complete() {
            return Err(LedgerError::ScheduleComplete);
        }

        let amount = request.amount.unwrap_or(loan.installment_amount);
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let installment_number = progress.next_installment_number();

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, loan_id, collector_id, amount, installment_number, notes, collected_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(loan.id)
        .bind(collector_id)
        .bind(amount)
        .bind(installment_number)
        .bind(request.notes)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LedgerError::DuplicateInstallment
            }
            _ => LedgerError::Database(e),
        })?;

        let new_paid_count = paid_count + 1;
        let loan_completed = new_paid_count >= loan.duration_months as i64;

        if loan_completed {
            sqlx::query("UPDATE loans SET status = 'completed', updated_at = $1 WHERE id = $2")
                .bind(Utc::now())
                .bind(loan.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        if loan_completed {
            tracing::info!(loan_id = %loan.id, "Final installment collected, loan completed");
        } else {
            tracing::info!(
                loan_id = %loan.id,
                installment = installment_number,
                amount,
                "Installment collected"
            );
        }

        Ok(PaymentReceipt {
            payment,
            paid_count: new_paid_count,
            duration_months: loan.duration_months,
            loan_completed,
        })
    }

    /// List payments for a loan in installment order
    pub async fn payments_for_loan(&self, loan_id: &Uuid) -> Result<Vec<Payment>, LedgerError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE loan_id = $1 ORDER BY installment_number ASC",
        )
        .bind(loan_id)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(payments)
    }

    /// Current repayment progress for a loan
    pub async fn progress(&self, loan_id: &Uuid) -> Result<LoanProgress, LedgerError> {
        let loan = sqlx::query_as::<_, LoanWithDuration>(
            r#"
            SELECT l.id, l.installment_amount, l.status, p.duration_months
            FROM loans l
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE l.id = $1
            "#,
        )
        .bind(loan_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(LedgerError::LoanNotFound)?;

        let (paid_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM payments WHERE loan_id = $1")
                .bind(loan.id)
                .fetch_one(&self.db_pool)
                .await?;

        Ok(LoanProgress::new(paid_count, loan.duration_months))
    }

    /// Derive the repayment schedule for a loan
    pub async fn schedule_for_loan(&self, loan: &Loan) -> Result<Vec<ScheduleEntry>, LedgerError> {
        let (duration_months,): (i32,) =
            sqlx::query_as("SELECT duration_months FROM loan_plans WHERE id = $1")
                .bind(loan.plan_id)
                .fetch_one(&self.db_pool)
                .await?;

        let payments = self.payments_for_loan(&loan.id).await?;

        Ok(build_schedule(
            loan.start_date,
            duration_months,
            loan.installment_amount,
            &payments,
            Utc::now().date_naive(),
        ))
    }
}
