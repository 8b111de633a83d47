//! File metadata types and repository.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{DepotError, Result};

/// Placement state of a file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    /// Metadata registered, bytes still staged.
    #[default]
    Pending,
    /// Bytes placed at the record's path.
    Stored,
    /// Placing the bytes failed; the record has no blob.
    Failed,
}

impl FileStatus {
    /// Convert status to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Stored => "stored",
            FileStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FileStatus::Pending),
            "stored" => Ok(FileStatus::Stored),
            "failed" => Ok(FileStatus::Failed),
            _ => Err(format!("unknown file status: {s}")),
        }
    }
}

impl TryFrom<String> for FileStatus {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Metadata for an uploaded file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Server-assigned file ID (UUID).
    pub file_id: String,
    /// Original filename, percent-decoded.
    pub file_name: String,
    /// Owner's username.
    pub username: String,
    /// Size in megabytes.
    pub size: f64,
    /// Storage directory the file belongs to.
    pub dir: String,
    /// Final location of the bytes.
    pub path: String,
    /// MIME type guessed from the filename.
    pub content_type: Option<String>,
    /// Placement state.
    #[sqlx(try_from = "String")]
    pub status: FileStatus,
    /// When the file was registered.
    pub created_at: String,
}

/// Data for registering a new file.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Original filename, percent-decoded.
    pub file_name: String,
    /// Owner's username.
    pub username: String,
    /// Size in megabytes.
    pub size: f64,
    /// Storage directory.
    pub dir: String,
    /// MIME type.
    pub content_type: Option<String>,
}

impl NewFile {
    /// Create a new NewFile. The content type is guessed from the name.
    pub fn new(
        file_name: impl Into<String>,
        username: impl Into<String>,
        size: f64,
        dir: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first()
            .map(|m| m.to_string());

        Self {
            file_name,
            username: username.into(),
            size,
            dir: dir.into(),
            content_type,
        }
    }
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new file and charge its size to the owner's quota.
    ///
    /// Both happen in one transaction. Returns `NotFound` for an unknown
    /// owner and `PayloadTooLarge` when the quota no longer covers the size.
    pub async fn create(&self, file: &NewFile) -> Result<FileRecord> {
        let file_id = Uuid::new_v4().to_string();
        let path = Path::new(&file.dir)
            .join(&file_id)
            .to_string_lossy()
            .into_owned();

        let mut tx = self.pool.begin().await?;

        let charged = sqlx::query(
            "UPDATE users SET remaining_size = remaining_size - ?
             WHERE username = ? AND remaining_size >= ?",
        )
        .bind(file.size)
        .bind(&file.username)
        .bind(file.size)
        .execute(&mut *tx)
        .await?;

        if charged.rows_affected() == 0 {
            let remaining: Option<f64> =
                sqlx::query_scalar("SELECT remaining_size FROM users WHERE username = ?")
                    .bind(&file.username)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match remaining {
                None => DepotError::NotFound("user".to_string()),
                Some(limit_mb) => DepotError::PayloadTooLarge {
                    size_mb: file.size,
                    limit_mb,
                },
            });
        }

        sqlx::query(
            "INSERT INTO files (file_id, file_name, username, size, dir, path, content_type, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&file_id)
        .bind(&file.file_name)
        .bind(&file.username)
        .bind(file.size)
        .bind(&file.dir)
        .bind(&path)
        .bind(&file.content_type)
        .bind(FileStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(&file_id, &file.username)
            .await?
            .ok_or_else(|| DepotError::NotFound("file".to_string()))
    }

    /// Get a file by ID, scoped to its owner.
    pub async fn get(&self, file_id: &str, username: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(
            "SELECT file_id, file_name, username, size, dir, path, content_type, status, created_at
             FROM files WHERE file_id = ? AND username = ?",
        )
        .bind(file_id)
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List files owned by a user, newest first.
    pub async fn list_by_owner(&self, username: &str) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(
            "SELECT file_id, file_name, username, size, dir, path, content_type, status, created_at
             FROM files WHERE username = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Count files owned by a user.
    pub async fn count_by_owner(&self, username: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE username = ?")
            .bind(username)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Update the placement status of a file.
    ///
    /// Returns false if the record no longer exists.
    pub async fn set_status(&self, file_id: &str, status: FileStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET status = ? WHERE file_id = ?")
            .bind(status.as_str())
            .bind(file_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a record that was just read and give its size back to the owner.
    ///
    /// Runs as one transaction. Returns false if the record was already gone.
    pub async fn delete_after_read(&self, file: &FileRecord) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM files WHERE file_id = ? AND username = ?")
            .bind(&file.file_id)
            .bind(&file.username)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE users SET remaining_size = remaining_size + ? WHERE username = ?")
            .bind(file.size)
            .bind(&file.username)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
