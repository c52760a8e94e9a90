//! Loan plan service layer

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::calculator::{plan_terms, CalculatorError};
use super::model::{CreatePlanRequest, LoanPlan};

/// Plan service errors
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan not found")]
    NotFound,

    #[error("Plan is referenced by existing loans and cannot be deleted")]
    InUse,

    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Loan plan service
#[derive(Clone)]
pub struct PlanService {
    db_pool: PgPool,
}

impl PlanService {
    /// Create a new plan service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a loan plan, deriving the fixed installment amount
    pub async fn create(&self, request: CreatePlanRequest) -> Result<LoanPlan, PlanError> {
        let terms = plan_terms(
            request.principal_amount,
            request.interest_rate,
            request.duration_months,
        )?;

        let plan = sqlx::query_as::<_, LoanPlan>(
            r#"
            INSERT INTO loan_plans (
                id, name, principal_amount, duration_months,
                interest_rate, installment_amount, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name)
        .bind(request.principal_amount)
        .bind(request.duration_months)
        .bind(request.interest_rate)
        .bind(terms.installment_amount)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            plan_id = %plan.id,
            installment = plan.installment_amount,
            "Loan plan created"
        );

        Ok(plan)
    }

    /// Get a plan by ID
    pub async fn get(&self, id: &Uuid) -> Result<Option<LoanPlan>, PlanError> {
        let plan = sqlx::query_as::<_, LoanPlan>("SELECT * FROM loan_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(plan)
    }

    /// List all plans, newest first
    pub async fn list(&self) -> Result<Vec<LoanPlan>, PlanError> {
        let plans =
            sqlx::query_as::<_, LoanPlan>("SELECT * FROM loan_plans ORDER BY created_at DESC")
                .fetch_all(&self.db_pool)
                .await?;
        Ok(plans)
    }

    /// Delete a plan. Plans referenced by any loan cannot be deleted; the
    /// foreign key is RESTRICT and the violation surfaces as `PlanError::InUse`.
    pub async fn delete(&self, id: &Uuid) -> Result<(), PlanError> {
        let result = sqlx::query("DELETE FROM loan_plans WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    PlanError::InUse
                }
                _ => PlanError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(PlanError::NotFound);
        }

        Ok(())
    }
}
