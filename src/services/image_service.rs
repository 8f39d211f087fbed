use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::images::{ImageDto, UploadedFile},
    entity::{
        images::{ActiveModel as ImageActive, Entity as Images, Model as ImageModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
};

pub fn download_url(api_prefix: &str, image_id: i64) -> String {
    format!("{}/images/image/download/{}", api_prefix.trim_end_matches('/'), image_id)
}

pub async fn get_image_by_id(db: &DatabaseConnection, id: i64) -> AppResult<ImageModel> {
    match Images::find_by_id(id).one(db).await? {
        Some(image) => Ok(image),
        None => Err(AppError::NotFound(format!("No image found with id: {id}"))),
    }
}

/// Store uploaded files against a product and return their download links.
pub async fn save_images(
    db: &DatabaseConnection,
    user: &AuthUser,
    api_prefix: &str,
    product_id: i64,
    files: Vec<UploadedFile>,
) -> AppResult<ApiResponse<Vec<ImageDto>>> {
    ensure_admin(user)?;
    if files.is_empty() {
        return Err(AppError::BadRequest("no files uploaded".into()));
    }

    let txn = db.begin().await?;
    if Products::find_by_id(product_id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound("Product not found!".into()));
    }

    let mut saved = Vec::with_capacity(files.len());
    for file in files {
        let image = ImageActive {
            id: NotSet,
            file_name: Set(file.file_name),
            file_type: Set(file.content_type),
            image: Set(file.bytes),
            download_url: Set(String::new()),
            product_id: Set(product_id),
        }
        .insert(&txn)
        .await?;

        // The link embeds the generated id, so it is written in a second step.
        let url = download_url(api_prefix, image.id);
        let mut active: ImageActive = image.into();
        active.download_url = Set(url);
        let image = active.update(&txn).await?;

        saved.push(ImageDto {
            id: image.id,
            file_name: image.file_name,
            download_url: image.download_url,
        });
    }
    txn.commit().await?;

    tracing::info!(product_id, count = saved.len(), "images uploaded");
    Ok(ApiResponse::success("Upload success!", saved))
}

pub async fn update_image(
    db: &DatabaseConnection,
    user: &AuthUser,
    id: i64,
    file: UploadedFile,
) -> AppResult<ApiResponse<ImageDto>> {
    ensure_admin(user)?;
    let existing = get_image_by_id(db, id).await?;

    let mut active: ImageActive = existing.into();
    active.file_name = Set(file.file_name);
    active.file_type = Set(file.content_type);
    active.image = Set(file.bytes);
    let image = active.update(db).await?;

    Ok(ApiResponse::success(
        "Update success!",
        ImageDto {
            id: image.id,
            file_name: image.file_name,
            download_url: image.download_url,
        },
    ))
}

pub async fn delete_image(
    db: &DatabaseConnection,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<()>> {
    ensure_admin(user)?;
    let result = Images::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("No image found with id: {id}")));
    }
    Ok(ApiResponse::empty("Delete success!"))
}

#[cfg(test)]
mod tests {
    use super::download_url;

    #[test]
    fn download_url_embeds_prefix_and_id() {
        assert_eq!(download_url("/api/v1", 42), "/api/v1/images/image/download/42");
        assert_eq!(download_url("/api/v1/", 7), "/api/v1/images/image/download/7");
    }
}
