//! Authentication API handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::auth::AuthError;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthTokensResponse, LoginRequest, RefreshTokenRequest};
use crate::state::AppState;

use super::AuthenticatedUser;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DatabaseError(e) => ApiError::DatabaseError(e),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Log in with email and password
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokensResponse>> {
    request.validate()?;

    let tokens = app_state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(tokens))
}

/// Exchange a refresh token for a fresh access token
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokensResponse>> {
    let tokens = app_state
        .auth_service
        .refresh(&request.refresh_token)
        .await?;

    Ok(Json(tokens))
}

/// Revoke the current session
pub async fn logout(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<serde_json::Value>> {
    app_state.auth_service.logout(&user.jti).await?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

/// Identity of the caller behind the presented token
pub async fn me(user: AuthenticatedUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "user_id": user.user_id,
        "email": user.email,
        "role": user.role,
    }))
}
