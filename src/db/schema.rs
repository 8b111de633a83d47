//! Database schema and migrations for filedepot.
//!
//! Migrations are applied in order; the schema_version table tracks which
//! ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users and their remaining storage quota
    r#"
CREATE TABLE users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL UNIQUE,
    remaining_size  REAL NOT NULL DEFAULT 0,   -- megabytes
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: file metadata
    r#"
CREATE TABLE files (
    file_id       TEXT PRIMARY KEY,
    file_name     TEXT NOT NULL,
    username      TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    size          REAL NOT NULL,                 -- megabytes
    dir           TEXT NOT NULL,
    path          TEXT NOT NULL,
    content_type  TEXT,
    status        TEXT NOT NULL DEFAULT 'pending',  -- 'pending', 'stored', 'failed'
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_username ON files(username);
"#,
];
