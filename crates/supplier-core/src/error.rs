//! Domain errors

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// A single identity failure, reported back to the caller as `{code, description}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityError {
    pub code: String,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::new("DuplicateEmail", format!("Email '{}' is already taken.", email))
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Supplier id in body ({body}) does not match id in path ({path})")]
    IdMismatch { path: Uuid, body: Uuid },

    #[error("The record could not be saved")]
    NotPersisted,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Supplier {0} was modified or removed concurrently")]
    ConcurrentModification(Uuid),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User is locked out")]
    LockedOut,

    #[error("Identity errors: {0:?}")]
    Identity(Vec<IdentityError>),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
