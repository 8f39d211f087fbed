use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::categories::{CategoryDto, CategoryRequest},
    entity::categories::{
        ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories,
        Model as CategoryModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
};

pub async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> AppResult<Option<CategoryModel>> {
    let category = Categories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(db)
        .await?;
    Ok(category)
}

/// Look a category up by name, inserting it when missing.
pub async fn find_or_create<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<CategoryModel> {
    if let Some(category) = find_by_name(db, name).await? {
        return Ok(category);
    }
    let category = CategoryActive {
        id: NotSet,
        name: Set(name.to_string()),
    }
    .insert(db)
    .await?;
    tracing::debug!(category_id = category.id, name, "category created");
    Ok(category)
}

async fn find_by_id(db: &DatabaseConnection, id: i64) -> AppResult<CategoryModel> {
    match Categories::find_by_id(id).one(db).await? {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound("Category not found!".into())),
    }
}

pub async fn get_all_categories(
    db: &DatabaseConnection,
) -> AppResult<ApiResponse<Vec<CategoryDto>>> {
    let categories = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(db)
        .await?
        .into_iter()
        .map(CategoryDto::from)
        .collect();
    Ok(ApiResponse::success("Found!", categories))
}

pub async fn get_category_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> AppResult<ApiResponse<CategoryDto>> {
    let category = find_by_id(db, id).await?;
    Ok(ApiResponse::success("Found", CategoryDto::from(category)))
}

pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> AppResult<ApiResponse<CategoryDto>> {
    match find_by_name(db, name).await? {
        Some(category) => Ok(ApiResponse::success("Found", CategoryDto::from(category))),
        None => Err(AppError::NotFound("Category not found!".into())),
    }
}

pub async fn add_category(
    db: &DatabaseConnection,
    user: &AuthUser,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<CategoryDto>> {
    ensure_admin(user)?;
    let exists = Categories::find()
        .filter(CategoryCol::Name.eq(payload.name.as_str()))
        .count(db)
        .await?
        > 0;
    if exists {
        return Err(AppError::AlreadyExists(format!(
            "{} already exists",
            payload.name
        )));
    }

    let category = CategoryActive {
        id: NotSet,
        name: Set(payload.name),
    }
    .insert(db)
    .await?;
    Ok(ApiResponse::success("Success", CategoryDto::from(category)))
}

pub async fn update_category(
    db: &DatabaseConnection,
    user: &AuthUser,
    id: i64,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<CategoryDto>> {
    ensure_admin(user)?;
    let existing = find_by_id(db, id).await?;

    let mut active: CategoryActive = existing.into();
    active.name = Set(payload.name);
    let category = active.update(db).await?;
    Ok(ApiResponse::success("Update success!", CategoryDto::from(category)))
}

pub async fn delete_category(
    db: &DatabaseConnection,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<()>> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Category not found!".into()));
    }
    Ok(ApiResponse::empty("Deleted"))
}
