//! Borrower models for Stratos

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Borrower status enum
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "borrower_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BorrowerStatus {
    Active,
    Inactive,
}

/// Borrower model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Borrower {
    pub id: Uuid,
    pub full_name: String,
    pub nic_number: String,
    pub phone: String,
    pub address: String,
    pub guarantor_name: Option<String>,
    pub guarantor_nic: Option<String>,
    pub guarantor_phone: Option<String>,
    pub status: BorrowerStatus,
    pub collector_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new borrower
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterBorrowerRequest {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub nic_number: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub guarantor_name: Option<String>,
    pub guarantor_nic: Option<String>,
    pub guarantor_phone: Option<String>,
    pub collector_id: Option<Uuid>,
}

/// Request to change a borrower's status
#[derive(Debug, Deserialize)]
pub struct UpdateBorrowerStatusRequest {
    pub status: BorrowerStatus,
}

/// Request to assign a borrower to a collector
#[derive(Debug, Deserialize)]
pub struct AssignCollectorRequest {
    pub collector_id: Option<Uuid>,
}

/// Query for listing borrowers
#[derive(Debug, Deserialize, Default)]
pub struct ListBorrowersQuery {
    pub status: Option<BorrowerStatus>,
    pub collector_id: Option<Uuid>,
    /// Matches against name, NIC number and phone
    pub search: Option<String>,
}
