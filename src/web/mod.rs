//! HTTP API for filedepot.
//!
//! Exposes upload, retrieval and deletion of files per user, plus a small
//! user registry, as a JSON API with an OpenAPI description.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
