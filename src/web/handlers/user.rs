//! User handlers for the HTTP API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{NewUser, UserRepository};
use crate::file::FileRepository;
use crate::web::dto::{CreateUserRequest, UserResponse, ValidatedJson};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// POST /api/users - Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Malformed JSON", body = ErrorBody),
        (status = 409, description = "Username taken", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let quota = req.remaining_size.unwrap_or(state.default_quota_mb);

    let user = UserRepository::new(state.db.pool())
        .create(&NewUser::new(&req.username, quota))
        .await?;

    tracing::info!(username = %user.username, quota_mb = quota, "Created user");

    Ok((StatusCode::CREATED, Json(UserResponse::new(user, 0))))
}

/// GET /api/users/{username} - Get a user and their remaining quota.
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    let file_count = FileRepository::new(state.db.pool())
        .count_by_owner(&user.username)
        .await?;

    Ok(Json(UserResponse::new(user, file_count)))
}
