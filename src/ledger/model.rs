//! Payment and repayment schedule models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Payment model - one row per collected installment, append-only
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub collector_id: Option<Uuid>,
    pub amount: i64,
    pub installment_number: i32,
    pub notes: Option<String>,
    pub collected_at: DateTime<Utc>,
}

/// Request to record a collected installment
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub loan_id: Uuid,
    /// Explicit collected amount; when absent the loan's fixed installment
    /// amount is used
    pub amount: Option<i64>,
    pub notes: Option<String>,
}

/// Result of recording a payment
#[derive(Debug, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub paid_count: i64,
    pub duration_months: i32,
    /// True when this payment completed the loan
    pub loan_completed: bool,
}

/// Repayment progress derived from the payment count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanProgress {
    pub paid_count: i64,
    pub duration_months: i32,
}

impl LoanProgress {
    pub fn new(paid_count: i64, duration_months: i32) -> Self {
        Self {
            paid_count,
            duration_months,
        }
    }

    /// The installment number the next payment will carry (1-based)
    pub fn next_installment_number(&self) -> i32 {
        self.paid_count as i32 + 1
    }

    /// Whether every installment in the schedule has been collected
    pub fn is_complete(&self) -> bool {
        self.paid_count >= self.duration_months as i64
    }
}

/// Status of one installment in the derived schedule
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Paid,
    Overdue,
    Pending,
}

/// One entry in the derived repayment schedule
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub installment_number: i32,
    pub due_date: NaiveDate,
    pub amount: i64,
    pub status: InstallmentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub collector_id: Option<Uuid>,
}
