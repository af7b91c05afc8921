//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::verify_password;
use crate::datetime::{to_rfc3339, to_storage};
use crate::db::{NewRefreshToken, RefreshTokenRepository, UserRepository};
use crate::web::dto::{
    ApiResponse, LoginRequest, LoginResponse, LogoutRequest, MeResponse, RefreshRequest,
    RefreshResponse, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/auth/login - User login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user_repo = UserRepository::new(state.db.pool());

    let user = user_repo
        .get_by_username(&req.username)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid username or password"))?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    verify_password(&req.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid username or password"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    let access_token = state.generate_access_token(user.id, &user.username, &user.role)?;
    let refresh_token = state.generate_refresh_token();

    store_refresh_token(&state, user.id, &refresh_token).await?;

    let _ = user_repo.update_last_login(user.id).await;

    let response = LoginResponse {
        access_token,
        refresh_token,
        expires_in: state.access_token_expiry,
        user: UserInfo {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role.as_str().to_string(),
        },
    };

    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/auth/logout - Revoke a refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = RefreshTokenRepository::new(state.db.pool());
    let _ = repo.revoke(&req.refresh_token).await;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/auth/refresh - Rotate a refresh token for a new session.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let token_repo = RefreshTokenRepository::new(state.db.pool());

    let token = token_repo
        .get_valid_token(&req.refresh_token)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user = UserRepository::new(state.db.pool())
        .get_by_id(token.user_id)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    // Rotation: revoke the old token before issuing a new one
    let _ = token_repo.revoke(&req.refresh_token).await;

    let access_token = state.generate_access_token(user.id, &user.username, &user.role)?;
    let new_refresh_token = state.generate_refresh_token();
    store_refresh_token(&state, user.id, &new_refresh_token).await?;

    Ok(Json(ApiResponse::new(RefreshResponse {
        access_token,
        refresh_token: new_refresh_token,
        expires_in: state.access_token_expiry,
    })))
}

/// GET /api/auth/me - Current user info.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(claims.sub)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let response = MeResponse {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        role: user.role.as_str().to_string(),
        created_at: to_rfc3339(&user.created_at),
        last_login_at: user.last_login.as_deref().map(to_rfc3339),
    };

    Ok(Json(ApiResponse::new(response)))
}

async fn store_refresh_token(
    state: &AppState,
    user_id: i64,
    token: &str,
) -> Result<(), ApiError> {
    let expires_at =
        chrono::Utc::now() + chrono::Duration::days(state.refresh_token_expiry as i64);
    let new_token = NewRefreshToken {
        user_id,
        token: token.to_string(),
        expires_at: to_storage(&expires_at),
    };
    RefreshTokenRepository::new(state.db.pool())
        .create(&new_token)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store refresh token: {}", e);
            ApiError::internal("Failed to create session")
        })?;
    Ok(())
}
