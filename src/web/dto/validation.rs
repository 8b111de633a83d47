//! Validation utilities for HTTP API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Malformed JSON is rejected with 400; a body failing validation is
/// rejected with 422 and field-level details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Validate that a username only uses ASCII letters, digits, `_` and `-`.
pub fn username_chars(value: &str) -> Result<(), validator::ValidationError> {
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(validator::ValidationError::new("username_chars")
            .with_message("Only letters, digits, '_' and '-' are allowed".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_chars_valid() {
        assert!(username_chars("alice").is_ok());
        assert!(username_chars("Bob_42").is_ok());
        assert!(username_chars("a-b").is_ok());
    }

    #[test]
    fn test_username_chars_invalid() {
        assert!(username_chars("a b").is_err());
        assert!(username_chars("../etc").is_err());
        assert!(username_chars("名前").is_err());
        assert!(username_chars("a\x00b").is_err());
    }
}
