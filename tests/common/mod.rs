//! Shared helpers for HTTP API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filedepot::db::{NewUser, UserRepository};
use filedepot::file::{FileStorage, TaskQueue};
use filedepot::web::router::create_app;
use filedepot::web::AppState;
use filedepot::Database;
use tempfile::TempDir;

pub const MB: usize = 1024 * 1024;

/// A running app backed by an in-memory database and a temporary
/// storage directory.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let storage = FileStorage::new(temp_dir.path().join("uploaded"))
            .expect("Failed to create storage");
        let (tasks, _worker) = TaskQueue::start(db.clone());

        let state = Arc::new(AppState::new(db, storage, tasks));
        let router = create_app(state.clone(), &[]);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Create a user directly in the database.
    pub async fn create_user(&self, username: &str, quota_mb: f64) {
        UserRepository::new(self.state.db.pool())
            .create(&NewUser::new(username, quota_mb))
            .await
            .expect("Failed to create user");
    }

    /// Remaining quota of a user, in megabytes.
    pub async fn remaining(&self, username: &str) -> f64 {
        UserRepository::new(self.state.db.pool())
            .get_by_username(username)
            .await
            .unwrap()
            .expect("user exists")
            .remaining_size
    }

    /// Wait for queued saves and deletes to finish.
    pub async fn flush(&self) {
        self.state.tasks.flush().await.expect("worker running");
    }

    /// Number of in-flight files in the staging directory.
    pub fn staged_count(&self) -> usize {
        std::fs::read_dir(self.state.storage.staging_path())
            .unwrap()
            .count()
    }
}

/// Build a multipart form with a single `file` field.
pub fn file_form(file_name: &str, content: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content)
            .file_name(file_name)
            .mime_type("application/octet-stream"),
    )
}
