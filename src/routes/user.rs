// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration, login and credit lookup.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::crypto;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::User;
use crate::AppState;

/// Credits granted to accounts created through the API.
pub const SERVER_STARTING_CREDITS: u32 = 5;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user/register", post(register))
        .route("/api/user/login", post(login))
}

/// Routes that need the auth middleware (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/user/credits", get(credits))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Missing Details"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Missing Details"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Missing Details"))]
    pub email: String,
    #[validate(length(min = 1, message = "Missing Details"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/lib/generated/")
)]
pub struct UserSummary {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/lib/generated/")
)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/lib/generated/")
)]
pub struct CreditsResponse {
    pub success: bool,
    pub credits: u32,
    pub user: UserSummary,
}

fn validation_error(err: validator::ValidationErrors) -> AppError {
    let message = err
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Missing Details".to_string());
    AppError::BadRequest(message)
}

fn session_response(state: &AppState, user: &User) -> Result<Json<AuthResponse>> {
    let token = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: UserSummary {
            name: user.name.clone(),
        },
    }))
}

/// Run store and bcrypt work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

/// Create an account and return a session token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    let blocking_state = Arc::clone(&state);
    let user = blocking(move || {
        let cost = blocking_state.config.bcrypt_cost;
        let password_hash = crypto::hash_password(&req.password, cost)?;
        blocking_state.users.create(
            &req.name,
            &req.email,
            password_hash,
            SERVER_STARTING_CREDITS,
        )
    })
    .await??;

    session_response(&state, &user)
}

/// Verify credentials and return a session token.
///
/// An unknown email still pays for one bcrypt verification.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    let blocking_state = Arc::clone(&state);
    let user = blocking(move || match blocking_state.users.find_by_email(&req.email) {
        Some(user) if crypto::verify_password(&req.password, &user.password_hash) => Some(user),
        Some(_) => None,
        None => {
            crypto::verify_unknown_user(&req.password, blocking_state.config.bcrypt_cost);
            None
        }
    })
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    tracing::info!(user_id = %user.id, "User logged in");
    session_response(&state, &user)
}

/// Credit balance of the authenticated user.
async fn credits(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<CreditsResponse>> {
    let blocking_state = Arc::clone(&state);
    let user_id = auth.user_id.clone();
    let user = blocking(move || blocking_state.users.get(&user_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;

    Ok(Json(CreditsResponse {
        success: true,
        credits: user.credits,
        user: UserSummary { name: user.name },
    }))
}
