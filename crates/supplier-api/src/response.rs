//! Response bodies for errors: the `ApiResponse` envelope and the validation problem

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use supplier_core::IdentityError;
use validator::ValidationErrors;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorDetail>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<IdentityError>>,
}

impl ApiResponse<()> {
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
                details: None,
            }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error_with_details(code: &str, message: &str, details: Vec<IdentityError>) -> Self {
        let mut response = Self::error(code, message);
        if let Some(error) = response.error.as_mut() {
            error.details = Some(details);
        }
        response
    }
}

/// Field-level validation failure body, served as `application/problem+json`.
#[derive(Debug, Serialize)]
pub struct ValidationProblem {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationProblem {
    pub const CONTENT_TYPE: &'static str = "application/problem+json";

    pub fn from_errors(status: u16, errors: &ValidationErrors) -> Self {
        let errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let messages = failures
                    .iter()
                    .map(|failure| match &failure.message {
                        Some(message) => message.to_string(),
                        None => format!("The {} field is invalid ({}).", field, failure.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            problem_type: "https://tools.ietf.org/html/rfc4918#section-11.2".to_string(),
            title: "One or more validation errors occurred.".to_string(),
            status,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplier_core::SupplierDraft;
    use uuid::Uuid;

    #[test]
    fn test_validation_problem_lists_fields() {
        let errors = SupplierDraft::default()
            .into_supplier(Uuid::new_v4())
            .unwrap_err();
        let problem = ValidationProblem::from_errors(422, &errors);

        assert_eq!(problem.status, 422);
        assert_eq!(problem.errors["name"], vec!["The name field is required.".to_string()]);
        assert_eq!(
            problem.errors["document"],
            vec!["The document field is required.".to_string()]
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::error("NOT_FOUND", "missing")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body["error"].get("details").is_none());
    }
}
