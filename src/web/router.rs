//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{CreateUserRequest, FileResponse, OperationStatus, UploadForm, UserResponse};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};
use super::handlers::{self, AppState};
use super::middleware::create_cors_layer;

/// OpenAPI description of the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(title = "filedepot", description = "Per-user file storage with quotas"),
    paths(
        handlers::file::upload_file,
        handlers::file::list_files,
        handlers::file::get_file,
        handlers::file::delete_file,
        handlers::user::create_user,
        handlers::user::get_user,
    ),
    components(schemas(
        OperationStatus,
        FileResponse,
        UserResponse,
        CreateUserRequest,
        UploadForm,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
    )),
    tags(
        (name = "files", description = "Upload, inspect and delete files"),
        (name = "users", description = "File owners and their quotas")
    )
)]
pub struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let file_routes = Router::new()
        .route(
            "/:username",
            post(handlers::upload_file).get(handlers::list_files),
        )
        .route(
            "/:username/:file_id",
            get(handlers::get_file).delete(handlers::delete_file),
        )
        .layer(DefaultBodyLimit::max(app_state.upload_body_limit()));

    let user_routes = Router::new()
        .route("/", post(handlers::create_user))
        .route("/:username", get(handlers::get_user));

    let api_routes = Router::new()
        .nest("/files", file_routes)
        .nest("/users", user_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create the full application: API, health check and API docs.
pub fn create_app(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    create_router(app_state, cors_origins)
        .merge(create_health_router())
        .merge(create_swagger_router())
}

async fn health_check() -> &'static str {
    "OK"
}
