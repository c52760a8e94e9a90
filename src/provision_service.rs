//! Collector account provisioning
//!
//! Admin-gated creation of collector logins. The system account and its role
//! profile are inserted in one transaction so a half-provisioned account can
//! never be left behind.

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Profile, UserRole};

/// Length of generated one-time passwords
const GENERATED_PASSWORD_LEN: usize = 12;

/// Provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Request to provision a collector account
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCollectorRequest {
    #[validate(email)]
    pub email: String,
    /// Initial password; when absent a temporary one is generated and
    /// returned once in the response
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(min = 1))]
    pub full_name: String,
    pub phone: Option<String>,
}

/// Result of provisioning a collector
#[derive(Debug, Serialize)]
pub struct CreatedCollector {
    pub profile: Profile,
    /// Present only when the password was generated server-side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// Provisioning service for collector accounts
#[derive(Clone)]
pub struct ProvisionService {
    db_pool: PgPool,
}

impl ProvisionService {
    /// Create a new provisioning service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a collector account with its role profile
    pub async fn create_collector(
        &self,
        request: CreateCollectorRequest,
    ) -> Result<CreatedCollector, ProvisionError> {
        let (password, generated_password) = match request.password {
            Some(p) => (p, None),
            None => {
                let generated = generate_password();
                (generated.clone(), Some(generated))
            }
        };

        let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            .map_err(|e| ProvisionError::Hash(e.to_string()))?;

        let user_id = Uuid::new_v4();
        let mut tx = self.db_pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ProvisionError::EmailTaken
            }
            _ => ProvisionError::Database(e),
        })?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, role, full_name, email, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(UserRole::Collector)
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(collector_id = %profile.id, "Collector account provisioned");

        Ok(CreatedCollector {
            profile,
            generated_password,
        })
    }

    /// List collector profiles, newest first
    pub async fn list_collectors(&self) -> Result<Vec<Profile>, ProvisionError> {
        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE role = 'collector' ORDER BY created_at DESC",
        )
        .fetch_all(&self.db_pool)
        .await?;
        Ok(profiles)
    }

    /// List every system profile, newest first
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, ProvisionError> {
        let profiles =
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at DESC")
                .fetch_all(&self.db_pool)
                .await?;
        Ok(profiles)
    }
}

/// Generate a temporary alphanumeric password
fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LEN);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
