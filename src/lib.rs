//! filedepot - per-user file storage backend.
//!
//! Accepts file uploads under a username, enforcing a per-file size limit
//! and the owner's storage quota, and serves their metadata over HTTP.
//! Placing and removing the bytes on disk happens in a background worker.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{DepotError, Result};
pub use file::{FileRecord, FileRepository, FileService, FileStatus, FileStorage, TaskQueue};
