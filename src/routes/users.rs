use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::users::{CreateUserRequest, UserDto, UserUpdateRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/user", get(get_user))
        .route("/add", post(create_user))
        .route("/{id}/update", put(update_user))
        .route("/{id}/delete", delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/user",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with cart and orders", body = ApiResponse<UserDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    let resp = user_service::get_user(&state.orm, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/add",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Create user", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let resp = user_service::create_user(&state.orm, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/update",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Update user", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdateRequest>,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    let resp = user_service::update_user(&state.orm, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/delete",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Delete user", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = user_service::delete_user(&state.orm, &user, id).await?;
    Ok(Json(resp))
}
