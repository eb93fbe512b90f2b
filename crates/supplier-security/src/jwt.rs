//! JWT token handling

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use supplier_shared::config::JwtSettings;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

const RESERVED_CLAIMS: &[&str] = &["sub", "email", "jti", "iat", "nbf", "exp", "iss", "aud", "role"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
    /// Custom user claims keyed by claim type. A type with several values is an array.
    #[serde(flatten)]
    pub custom: BTreeMap<String, Value>,
}

impl Claims {
    /// True when the token carries `claim_type` with any value.
    pub fn has_claim(&self, claim_type: &str) -> bool {
        self.custom.contains_key(claim_type)
    }

    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::ValidationError(e.to_string()))
    }
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: i64,
    issuer: String,
    audience: String,
}

impl JwtService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            expiry_seconds: settings.expiration_hours.saturating_mul(3600),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
        }
    }

    /// Signs a token for `user_id` embedding roles and custom `(type, value)` claims.
    pub fn issue(
        &self,
        user_id: &Uuid,
        email: &str,
        roles: &[String],
        user_claims: &[(String, String)],
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.expiry_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::CreationError("token lifetime out of range".to_string()))?;

        let mut custom: BTreeMap<String, Value> = BTreeMap::new();
        for (claim_type, claim_value) in user_claims {
            if RESERVED_CLAIMS.contains(&claim_type.as_str()) {
                warn!("Skipping user claim that shadows a registered claim: {}", claim_type);
                continue;
            }
            let value = Value::String(claim_value.clone());
            match custom.remove(claim_type) {
                None => {
                    custom.insert(claim_type.clone(), value);
                }
                Some(Value::Array(mut values)) => {
                    values.push(value);
                    custom.insert(claim_type.clone(), Value::Array(values));
                }
                Some(existing) => {
                    custom.insert(claim_type.clone(), Value::Array(vec![existing, value]));
                }
            }
        }

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            role: roles.to_vec(),
            custom,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.expiry_seconds,
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })
    }
}
