//! API handlers for filedepot.

pub mod file;
pub mod user;

pub use file::*;
pub use user::*;

use crate::file::{FileService, FileStorage, TaskQueue, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_QUOTA_MB};
use crate::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Database,
    /// Storage directory for uploaded files.
    pub storage: FileStorage,
    /// Queue feeding the deferred save/delete worker.
    pub tasks: TaskQueue,
    /// Per-file upload limit in megabytes.
    pub max_file_size_mb: f64,
    /// Quota given to users created without one, in megabytes.
    pub default_quota_mb: f64,
}

impl AppState {
    /// Create a new application state with default limits.
    pub fn new(db: Database, storage: FileStorage, tasks: TaskQueue) -> Self {
        Self {
            db,
            storage,
            tasks,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            default_quota_mb: DEFAULT_QUOTA_MB,
        }
    }

    /// Set the per-file upload limit.
    pub fn with_max_file_size(mut self, max_file_size_mb: f64) -> Self {
        self.max_file_size_mb = max_file_size_mb;
        self
    }

    /// Set the default quota for new users.
    pub fn with_default_quota(mut self, default_quota_mb: f64) -> Self {
        self.default_quota_mb = default_quota_mb;
        self
    }

    /// File service bound to this state.
    pub fn file_service(&self) -> FileService<'_> {
        FileService::new(&self.db, &self.storage, &self.tasks)
            .with_max_file_size(self.max_file_size_mb)
    }

    /// Request body limit for upload routes, in bytes.
    ///
    /// Leaves room for multipart framing on top of the file itself.
    pub fn upload_body_limit(&self) -> usize {
        // Float to int casts saturate, so only the addition can overflow.
        ((self.max_file_size_mb * crate::file::BYTES_PER_MB) as usize).saturating_add(1024 * 1024)
    }
}
