//! Bearer token extractor and claim checks

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use supplier_security::{Claims, JwtError};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity of the caller, taken from a valid `Authorization: Bearer <jwt>` header.
/// Adding it to a handler's arguments makes the route require authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// 403 unless the token carries `claim_type` (any value).
    pub fn require_claim(&self, claim_type: &str) -> Result<(), ApiError> {
        if self.claims.has_claim(claim_type) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("Claim '{}' required", claim_type)))
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state.jwt.validate_token(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            match e {
                JwtError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
                _ => ApiError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            claims,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ApiError::Unauthorized("Missing bearer token".to_string()));
    }

    Ok(token.trim())
}
