//! Loan plan models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Loan plan model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct LoanPlan {
    pub id: Uuid,
    pub name: String,
    pub principal_amount: i64,
    pub duration_months: i32,
    /// Flat annual interest rate, percent
    pub interest_rate: f64,
    /// Fixed monthly installment derived at creation
    pub installment_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new loan plan
///
/// The installment amount is not accepted from the caller; it is always
/// derived by the calculator.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub principal_amount: i64,
    pub duration_months: i32,
    pub interest_rate: f64,
}
