//! File management module for filedepot.
//!
//! This module provides the upload pipeline:
//! - Admission and staging of incoming bytes under size and quota limits
//! - File metadata records scoped by owner
//! - Deferred placement and removal of the bytes on disk

mod deferred;
mod metadata;
mod service;
mod storage;

pub use deferred::{DeferredTask, TaskQueue};
pub use metadata::{FileRecord, FileRepository, FileStatus, NewFile};
pub use service::{decode_file_name, FileService};
pub use storage::{FileStorage, StagedFile};

/// Default maximum size of a single upload, in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 5.0;

/// Default quota for newly created users, in megabytes.
pub const DEFAULT_QUOTA_MB: f64 = 100.0;

/// Number of bytes in one megabyte as used for sizes and quotas.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to megabytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}
