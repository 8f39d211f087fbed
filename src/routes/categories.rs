use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::categories::{CategoryDto, CategoryRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(get_all_categories))
        .route("/add", post(add_category))
        .route("/category/{id}/category", get(get_category_by_id))
        .route("/category/by-name/{name}", get(get_category_by_name))
        .route("/category/{id}/update", put(update_category))
        .route("/category/{id}/delete", delete(delete_category))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/all",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<CategoryDto>>)),
    tag = "Categories"
)]
pub async fn get_all_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CategoryDto>>>> {
    Ok(Json(category_service::get_all_categories(&state.orm).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories/add",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<CategoryDto>),
        (status = 409, description = "Category already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn add_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<CategoryDto>>> {
    Ok(Json(category_service::add_category(&state.orm, &user, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/category/{id}/category",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<CategoryDto>>> {
    Ok(Json(category_service::get_category_by_id(&state.orm, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/category/by-name/{name}",
    params(("name" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryDto>>> {
    Ok(Json(category_service::get_category_by_name(&state.orm, &name).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/category/{id}/update",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<CategoryDto>>> {
    Ok(Json(category_service::update_category(&state.orm, &user, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/category/{id}/delete",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(category_service::delete_category(&state.orm, &user, id).await?))
}
