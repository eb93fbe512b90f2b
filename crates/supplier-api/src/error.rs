use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use supplier_core::{DomainError, IdentityError};
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::{ApiResponse, ValidationProblem};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Identity errors: {0:?}")]
    Identity(Vec<IdentityError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::SupplierNotFound(_) | DomainError::UserNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            DomainError::IdMismatch { .. } => ApiError::BadRequest(err.to_string()),
            DomainError::NotPersisted | DomainError::ConstraintViolation(_) => {
                tracing::warn!("Write rejected by storage: {}", err);
                ApiError::BadRequest("There was a problem saving the record".to_string())
            }
            DomainError::ConcurrentModification(_) => ApiError::Conflict(err.to_string()),
            DomainError::InvalidCredentials | DomainError::LockedOut => {
                ApiError::BadRequest(err.to_string())
            }
            DomainError::Identity(errors) => ApiError::Identity(errors),
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Validation(errors) => {
                tracing::warn!("Validation failed: {}", errors);
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let problem = ValidationProblem::from_errors(status.as_u16(), &errors);
                let mut response = (status, Json(problem)).into_response();
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(ValidationProblem::CONTENT_TYPE),
                );
                return response;
            }
            ApiError::Identity(errors) => {
                tracing::warn!("Identity errors: {:?}", errors);
                let body = ApiResponse::error_with_details(
                    "IDENTITY_ERROR",
                    "The account could not be created",
                    errors,
                );
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                let body = ApiResponse::error("UNAUTHORIZED", &msg);
                let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                return response;
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "CONFLICT", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                // Details stay in the log.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}
