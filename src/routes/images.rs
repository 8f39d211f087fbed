use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use crate::{
    dto::images::{ImageDto, UploadImagesQuery, UploadedFile},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::image_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(save_images))
        .route("/image/download/{id}", get(download_image))
        .route("/image/{id}/update", put(update_image))
        .route("/image/{id}/delete", delete(delete_image))
}

async fn read_files(mut multipart: Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        files.push(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(files)
}

#[utoipa::path(
    post,
    path = "/api/v1/images/upload",
    params(("product_id" = i64, Query, description = "Product the images belong to")),
    request_body(content_type = "multipart/form-data", description = "One or more `files` parts"),
    responses(
        (status = 200, description = "Images stored", body = ApiResponse<Vec<ImageDto>>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn save_images(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UploadImagesQuery>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Vec<ImageDto>>>> {
    let files = read_files(multipart).await?;
    let resp = image_service::save_images(
        &state.orm,
        &user,
        &state.api_prefix,
        query.product_id,
        files,
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/image/download/{id}",
    params(("id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Raw image bytes"),
        (status = 404, description = "Image not found"),
    ),
    tag = "Images"
)]
pub async fn download_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let image = image_service::get_image_by_id(&state.orm, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", image.file_name.replace('"', ""));
    Ok((
        [
            (header::CONTENT_TYPE, image.file_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        image.image,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/images/image/{id}/update",
    params(("id" = i64, Path, description = "Image ID")),
    request_body(content_type = "multipart/form-data", description = "A single `file` part"),
    responses(
        (status = 200, description = "Image replaced", body = ApiResponse<ImageDto>),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn update_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ImageDto>>> {
    let file = match read_files(multipart).await?.into_iter().next() {
        Some(f) => f,
        None => return Err(AppError::BadRequest("no file uploaded".into())),
    };
    let resp = image_service::update_image(&state.orm, &user, id, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/images/image/{id}/delete",
    params(("id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(image_service::delete_image(&state.orm, &user, id).await?))
}
