use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::{
    jwt::{create_token_pair, hash_token, verify_token, TokenPair, TokenType},
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::config::Config;
use crate::db::{tokens, users};
use crate::error::{AppError, AppResult};
use crate::models::user::{validate_username, UserProfile};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "validate_username")]
    pub username: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Create a token pair AND persist the refresh token hash.
async fn issue_token_pair(
    db: &SqlitePool,
    user_id: i64,
    username: &str,
    config: &Config,
    parent_token_id: Option<&str>,
) -> AppResult<TokenPair> {
    let pair = create_token_pair(user_id, username, config)?;
    let token_hash = hash_token(&pair.refresh_token);
    tokens::insert(
        db,
        user_id,
        &token_hash,
        config.jwt_refresh_ttl_secs,
        parent_token_id,
    )
    .await?;
    Ok(pair)
}

pub async fn register(
    State(state): State<AppState>,
    Json(mut body): Json<RegisterRequest>,
) -> AppResult<Json<TokenPair>> {
    // Identity fields are stored normalized: trimmed username, trimmed
    // lowercased email (uniqueness is case-insensitive).
    body.username = body.username.trim().to_string();
    body.email = body.email.trim().to_lowercase();

    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Enforces the minimum password length before any row is written.
    let password_hash = hash_password(&body.password)?;

    if users::username_exists(&state.db, &body.username).await? {
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if users::email_exists(&state.db, &body.email).await? {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let user = users::create(&state.db, &body.username, &body.email, &password_hash).await?;
    tracing::info!(user_id = user.id, "Account registered");

    let pair = issue_token_pair(&state.db, user.id, &user.username, &state.config, None).await?;
    Ok(Json(pair))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    let identifier = body.identifier.trim();
    if identifier.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Please enter both username/email and password".into(),
        ));
    }

    // Try username first, then email.
    let user = match users::find_by_username(&state.db, identifier).await? {
        Some(user) => Some(user),
        None => users::find_by_email(&state.db, &identifier.to_lowercase()).await?,
    };

    let user = user.ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let pair = issue_token_pair(&state.db, user.id, &user.username, &state.config, None).await?;
    Ok(Json(pair))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let token_data = verify_token(&body.refresh_token, &state.config)?;

    if token_data.claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized);
    }

    let token_hash = hash_token(&body.refresh_token);
    let stored = tokens::find_by_hash(&state.db, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Reuse detection: a revoked token being presented again means the
    // whole family is suspect.
    if stored.revoked {
        tracing::warn!(
            user_id = stored.user_id,
            token_id = %stored.id,
            "Refresh token reuse detected, revoking all tokens for user"
        );
        tokens::revoke_all_for_user(&state.db, stored.user_id).await?;
        return Err(AppError::Unauthorized);
    }

    if stored.user_id != token_data.claims.sub {
        return Err(AppError::Unauthorized);
    }

    // Single-use rotation: retire the presented token, link its child.
    tokens::revoke(&state.db, &stored.id).await?;

    let pair = issue_token_pair(
        &state.db,
        token_data.claims.sub,
        &token_data.claims.username,
        &state.config,
        Some(&stored.id),
    )
    .await?;
    Ok(Json(pair))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    tokens::revoke_all_for_user(&state.db, auth_user.id).await?;
    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = users::find_by_id(&state.db, auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let user = users::find_by_id(&state.db, auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if !verify_password(&body.current_password, &user.password_hash) {
        return Err(AppError::Validation("Current password is incorrect".into()));
    }

    let new_hash = hash_password(&body.new_password)?;
    users::update_password(&state.db, user.id, &new_hash).await?;

    // Credential rotation invalidates every open session.
    tokens::revoke_all_for_user(&state.db, user.id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Password changed successfully" }),
    ))
}
