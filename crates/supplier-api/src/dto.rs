//! Request and response DTOs

use serde::{Deserialize, Serialize};
use supplier_core::services::AuthToken;
use supplier_shared::constants::MAX_PASSWORD_LENGTH;
use uuid::Uuid;
use validator::Validate;

/// Register request payload
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field is not a valid e-mail address.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        length(
            max = MAX_PASSWORD_LENGTH,
            message = "The password must be at most 100 characters long."
        )
    )]
    pub password: Option<String>,
}

/// Login request payload
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginUserRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field is not a valid e-mail address.")
    )]
    pub email: Option<String>,

    #[validate(required(message = "The password field is required."))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimDto {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserTokenDto {
    pub id: Uuid,
    pub email: String,
    pub claims: Vec<ClaimDto>,
}

/// Authentication response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user_token: UserTokenDto,
}

impl From<AuthToken> for TokenResponse {
    fn from(token: AuthToken) -> Self {
        let roles = token.roles.into_iter().map(|role| ClaimDto {
            claim_type: "role".to_string(),
            value: role,
        });
        let claims = token
            .claims
            .into_iter()
            .map(|c| ClaimDto {
                claim_type: c.claim_type,
                value: c.claim_value,
            })
            .chain(roles)
            .collect();

        Self {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user_token: UserTokenDto {
                id: token.user_id,
                email: token.email,
                claims,
            },
        }
    }
}
