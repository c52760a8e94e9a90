//! Loan models for Stratos

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Loan status enum
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Completed,
    Defaulted,
}

/// Loan model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Loan {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub plan_id: Uuid,
    pub principal_amount: i64,
    pub installment_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to issue a new loan
#[derive(Debug, Deserialize)]
pub struct IssueLoanRequest {
    pub borrower_id: Uuid,
    pub plan_id: Uuid,
}

/// Query for listing loans
#[derive(Debug, Deserialize, Default)]
pub struct ListLoansQuery {
    pub borrower_id: Option<Uuid>,
    pub status: Option<LoanStatus>,
}

/// Loan row joined with borrower and plan context for listings
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LoanSummaryRow {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub borrower_name: String,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub duration_months: i32,
    pub principal_amount: i64,
    pub installment_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LoanStatus,
}
