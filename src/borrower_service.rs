//! Borrower service layer - Registry management for borrowers

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::borrower::{Borrower, BorrowerStatus, ListBorrowersQuery, RegisterBorrowerRequest};

/// Borrower service for registry operations
#[derive(Clone)]
pub struct BorrowerService {
    db_pool: PgPool,
}

impl BorrowerService {
    /// Create a new borrower service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Register a new borrower
    pub async fn register(&self, request: RegisterBorrowerRequest) -> Result<Borrower> {
        let borrower = sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (
                id, full_name, nic_number, phone, address,
                guarantor_name, guarantor_nic, guarantor_phone,
                status, collector_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.full_name)
        .bind(request.nic_number)
        .bind(request.phone)
        .bind(request.address)
        .bind(request.guarantor_name)
        .bind(request.guarantor_nic)
        .bind(request.guarantor_phone)
        .bind(BorrowerStatus::Active)
        .bind(request.collector_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to insert borrower into database")?;

        Ok(borrower)
    }

    /// Get borrower by ID
    pub async fn get(&self, id: &Uuid) -> Result<Option<Borrower>> {
        let borrower = sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(borrower)
    }

    /// List borrowers with optional filters and text search
    pub async fn list(&self, query: ListBorrowersQuery) -> Result<Vec<Borrower>> {
        let mut builder = QueryBuilder::new("SELECT * FROM borrowers WHERE 1=1");

        if let Some(status) = query.status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }
        if let Some(collector_id) = query.collector_id {
            builder.push(" AND collector_id = ");
            builder.push_bind(collector_id);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            builder.push(" AND (full_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR nic_number ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR phone ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY full_name ASC");

        let borrowers = builder
            .build_query_as::<Borrower>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(borrowers)
    }

    /// List active borrowers assigned to a collector
    pub async fn list_for_collector(&self, collector_id: &Uuid) -> Result<Vec<Borrower>> {
        let borrowers = sqlx::query_as::<_, Borrower>(
            r#"
            SELECT * FROM borrowers
            WHERE status = 'active' AND collector_id = $1
            ORDER BY full_name ASC
            "#,
        )
        .bind(collector_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(borrowers)
    }

    /// Change a borrower's status
    pub async fn update_status(
        &self,
        id: &Uuid,
        status: BorrowerStatus,
    ) -> Result<Option<Borrower>> {
        let borrower = sqlx::query_as::<_, Borrower>(
            "UPDATE borrowers SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(borrower)
    }

    /// Assign (or unassign) the borrower's field collector
    pub async fn assign_collector(
        &self,
        id: &Uuid,
        collector_id: Option<Uuid>,
    ) -> Result<Option<Borrower>> {
        let borrower = sqlx::query_as::<_, Borrower>(
            "UPDATE borrowers SET collector_id = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(collector_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(borrower)
    }
}
