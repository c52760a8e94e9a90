//! Authentication service
//!
//! Core business logic for email/password authentication and session
//! revocation.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AuthSession, AuthTokensResponse, Profile, User, UserResponse};

use super::jwt::{generate_access_token, generate_refresh_token, verify_token, JwtError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Session not found or revoked")]
    SessionNotFound,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::DatabaseError(e.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_days: i64,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        db_pool: PgPool,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        refresh_token_ttl_days: i64,
    ) -> Self {
        Self {
            db_pool,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_days,
        }
    }

    /// Get the JWT secret (for token verification in middleware)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Authenticate with email and password, issuing access and refresh
    /// tokens backed by a new session
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokensResponse, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // A malformed stored hash reads the same as a bad password
        let valid =
            bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user.id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // One session per login; the jti is shared between the access and
        // refresh token so revoking the session kills both.
        let jti = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::days(self.refresh_token_ttl_days);

        sqlx::query(
            r#"
            INSERT INTO auth_sessions (id, user_id, jti, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&jti)
        .bind(expires_at)
        .execute(&self.db_pool)
        .await?;

        let access_token = generate_access_token(
            user.id,
            &user.email,
            profile.role,
            &jti,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?;
        let refresh_token = generate_refresh_token(
            user.id,
            &user.email,
            profile.role,
            &jti,
            &self.jwt_secret,
            self.refresh_token_ttl_days,
        )?;

        tracing::info!(user_id = %user.id, role = %profile.role.as_str(), "User logged in");

        Ok(AuthTokensResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
            user: UserResponse {
                id: user.id,
                email: user.email,
                full_name: profile.full_name,
                role: profile.role,
                created_at: user.created_at,
            },
        })
    }

    /// Exchange a refresh token for a fresh access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokensResponse, AuthError> {
        let claims = verify_token(refresh_token, &self.jwt_secret)?;
        if claims.token_type != "refresh" {
            return Err(AuthError::InvalidRefreshToken);
        }

        self.verify_session(&claims.jti).await?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user.id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access_token = generate_access_token(
            user.id,
            &user.email,
            profile.role,
            &claims.jti,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?;

        Ok(AuthTokensResponse {
            access_token,
            refresh_token: refresh_token.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
            user: UserResponse {
                id: user.id,
                email: user.email,
                full_name: profile.full_name,
                role: profile.role,
                created_at: user.created_at,
            },
        })
    }

    /// Revoke the session behind a jti (logout)
    pub async fn logout(&self, jti: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET revoked = TRUE, revoked_at = $1 WHERE jti = $2 AND NOT revoked",
        )
        .bind(Utc::now())
        .bind(jti)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::SessionNotFound);
        }

        Ok(())
    }

    /// Verify a session is still valid (not revoked, not expired)
    pub async fn verify_session(&self, jti: &str) -> Result<(), AuthError> {
        let session =
            sqlx::query_as::<_, AuthSession>("SELECT * FROM auth_sessions WHERE jti = $1")
                .bind(jti)
                .fetch_optional(&self.db_pool)
                .await?;

        match session {
            Some(s) if !s.revoked && s.expires_at > Utc::now() => Ok(()),
            _ => Err(AuthError::SessionNotFound),
        }
    }
}
