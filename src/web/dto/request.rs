//! Request DTOs for the HTTP API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::username_chars;

/// User creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Username: 1-32 letters, digits, `_` or `-`.
    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    /// Initial quota in megabytes. The configured default is used when absent.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Quota must not be negative"))]
    pub remaining_size: Option<f64>,
}

/// Multipart body of an upload request.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// File content. The filename may be percent-encoded.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
