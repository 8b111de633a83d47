//! File service for filedepot.
//!
//! High-level operations behind the HTTP routes:
//! - Upload with streaming size and quota checks
//! - Owner-scoped retrieval and listing
//! - Deletion with deferred removal of the bytes

use std::path::PathBuf;

use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::db::UserRepository;
use crate::{Database, DepotError, Result};

use super::deferred::{DeferredTask, TaskQueue};
use super::metadata::{FileRecord, FileRepository, NewFile};
use super::storage::FileStorage;
use super::{bytes_to_mb, DEFAULT_MAX_FILE_SIZE_MB};

/// Decode a percent-encoded filename.
///
/// `+` is left as is. A name that does not decode to valid UTF-8 is kept
/// unchanged.
pub fn decode_file_name(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Reject decoded names that are blank or carry control characters.
fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.trim().is_empty() {
        return Err(DepotError::Validation(
            "file name must not be empty".to_string(),
        ));
    }
    if file_name.chars().any(char::is_control) {
        return Err(DepotError::Validation(
            "file name must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

/// File service tying together metadata, staging and deferred persistence.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a FileStorage,
    tasks: &'a TaskQueue,
    max_file_size_mb: f64,
}

impl<'a> FileService<'a> {
    /// Create a new FileService with the default size limit.
    pub fn new(db: &'a Database, storage: &'a FileStorage, tasks: &'a TaskQueue) -> Self {
        Self {
            db,
            storage,
            tasks,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }

    /// Set the per-file size limit in megabytes.
    pub fn with_max_file_size(mut self, max_file_size_mb: f64) -> Self {
        self.max_file_size_mb = max_file_size_mb;
        self
    }

    /// Accept an upload for `username`.
    ///
    /// The stream is staged chunk by chunk; the upload is rejected with
    /// `PayloadTooLarge` as soon as the running size exceeds the per-file
    /// limit or the owner's remaining quota. On success the metadata is
    /// registered and placing the bytes is left to the deferred worker.
    pub async fn upload<S, B, E>(
        &self,
        username: &str,
        raw_file_name: &str,
        chunks: S,
    ) -> Result<FileRecord>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let owner = UserRepository::new(self.db.pool())
            .get_by_username(username)
            .await?
            .ok_or_else(|| DepotError::NotFound("user".to_string()))?;

        let file_name = decode_file_name(raw_file_name);
        validate_file_name(&file_name)?;

        let mut staged = self.storage.stage()?;
        let mut chunks = std::pin::pin!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| DepotError::Upload(e.to_string()))?;
            let chunk = chunk.as_ref();

            let size_mb = bytes_to_mb(staged.bytes_written() + chunk.len() as u64);
            if size_mb > self.max_file_size_mb {
                return Err(DepotError::PayloadTooLarge {
                    size_mb,
                    limit_mb: self.max_file_size_mb,
                });
            }
            if !owner.has_room_for(size_mb) {
                return Err(DepotError::PayloadTooLarge {
                    size_mb,
                    limit_mb: owner.remaining_size,
                });
            }

            staged.write_chunk(chunk).await?;
        }

        let size_mb = bytes_to_mb(staged.bytes_written());
        let staged = staged.finish().await?;

        let repo = FileRepository::new(self.db.pool());
        let record = repo
            .create(&NewFile::new(
                file_name,
                username,
                size_mb,
                self.storage.dir(),
            ))
            .await?;

        let task = DeferredTask::Save {
            file_id: record.file_id.clone(),
            staged,
            dest: PathBuf::from(&record.path),
        };
        if let Err(e) = self.tasks.enqueue(task) {
            repo.delete_after_read(&record).await?;
            return Err(e);
        }

        info!(
            file_id = %record.file_id,
            username,
            size_mb,
            "Accepted upload"
        );
        Ok(record)
    }

    /// Get a file's metadata, scoped to its owner.
    pub async fn get(&self, username: &str, file_id: &str) -> Result<FileRecord> {
        FileRepository::new(self.db.pool())
            .get(file_id, username)
            .await?
            .ok_or_else(|| DepotError::NotFound("file".to_string()))
    }

    /// List a user's files, newest first.
    pub async fn list(&self, username: &str) -> Result<Vec<FileRecord>> {
        if !UserRepository::new(self.db.pool())
            .username_exists(username)
            .await?
        {
            return Err(DepotError::NotFound("user".to_string()));
        }

        FileRepository::new(self.db.pool())
            .list_by_owner(username)
            .await
    }

    /// Delete a file's metadata and schedule removal of its bytes.
    pub async fn delete(&self, username: &str, file_id: &str) -> Result<FileRecord> {
        let record = self.get(username, file_id).await?;

        if !FileRepository::new(self.db.pool())
            .delete_after_read(&record)
            .await?
        {
            return Err(DepotError::NotFound("file".to_string()));
        }

        let task = DeferredTask::Delete {
            file_id: record.file_id.clone(),
            path: PathBuf::from(&record.path),
        };
        if let Err(e) = self.tasks.enqueue(task) {
            warn!(file_id = %record.file_id, error = %e, "File bytes left on disk");
        }

        info!(file_id = %record.file_id, username, "Deleted file");
        Ok(record)
    }
}
