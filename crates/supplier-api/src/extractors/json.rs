//! JSON body extractor that reports absent or malformed bodies as 400

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub const MISSING_BODY_MESSAGE: &str = "Request body is required";

/// Like `axum::Json`, but a missing, empty or `null` body and any parse
/// failure become `ApiError::BadRequest`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = is_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::BadRequest(MISSING_BODY_MESSAGE.to_string()));
        }

        if !json_content {
            return Err(ApiError::BadRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ));
        }

        match serde_json::from_slice::<Option<T>>(&bytes) {
            Ok(Some(value)) => Ok(JsonBody(value)),
            Ok(None) => Err(ApiError::BadRequest(MISSING_BODY_MESSAGE.to_string())),
            Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {}", e))),
        }
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
