//! Response DTOs for the HTTP API.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::User;
use crate::file::FileRecord;

/// Detail text of a successful operation.
pub const OPERATION_SUCCESSFUL: &str = "operation successful";

/// Convert a SQLite `YYYY-MM-DD HH:MM:SS` UTC timestamp to RFC 3339.
///
/// Values in any other format are returned unchanged.
pub fn to_rfc3339(datetime_str: &str) -> String {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc().to_rfc3339())
        .unwrap_or_else(|_| datetime_str.to_string())
}

/// Acknowledgment of an upload or delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperationStatus {
    /// Decoded filename for uploads, file ID for deletes.
    pub id: String,
    /// Outcome description.
    pub detail: String,
    /// ID assigned to an uploaded file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl OperationStatus {
    /// Acknowledge an accepted upload.
    pub fn uploaded(record: &FileRecord) -> Self {
        Self {
            id: record.file_name.clone(),
            detail: OPERATION_SUCCESSFUL.to_string(),
            file_id: Some(record.file_id.clone()),
        }
    }

    /// Acknowledge a deletion.
    pub fn deleted(record: &FileRecord) -> Self {
        Self {
            id: record.file_id.clone(),
            detail: OPERATION_SUCCESSFUL.to_string(),
            file_id: None,
        }
    }
}

/// File metadata response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    pub file_id: String,
    pub file_name: String,
    pub username: String,
    /// Size in megabytes.
    pub size: f64,
    pub dir: String,
    pub path: String,
    pub content_type: Option<String>,
    /// `pending`, `stored` or `failed`.
    pub status: String,
    pub created_at: String,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            file_id: record.file_id,
            file_name: record.file_name,
            username: record.username,
            size: record.size,
            dir: record.dir,
            path: record.path,
            content_type: record.content_type,
            status: record.status.to_string(),
            created_at: to_rfc3339(&record.created_at),
        }
    }
}

/// User response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    /// Remaining quota in megabytes.
    pub remaining_size: f64,
    /// Number of files owned.
    pub file_count: i64,
    pub created_at: String,
}

impl UserResponse {
    pub fn new(user: User, file_count: i64) -> Self {
        Self {
            username: user.username,
            remaining_size: user.remaining_size,
            file_count,
            created_at: to_rfc3339(&user.created_at),
        }
    }
}
