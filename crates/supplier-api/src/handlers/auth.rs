// ============================================================================
// Supplier API - Auth Handlers
// File: crates/supplier-api/src/handlers/auth.rs
// ============================================================================
//! User registration and login (POST /registro, POST /login)

use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{LoginUserRequest, RegisterUserRequest, TokenResponse};
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// Register handler - POST /registro
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUserRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let token = state.auth.register(&email, &password).await?;
    Ok(Json(token.into()))
}

/// Login handler - POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginUserRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let token = state.auth.login(&email, &password).await?;
    Ok(Json(token.into()))
}
