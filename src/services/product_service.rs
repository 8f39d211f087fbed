use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::JoinType;

use crate::{
    dto::{
        categories::CategoryDto,
        images::ImageDto,
        products::{AddProductRequest, ProductDto, ProductList, ProductUpdateRequest},
    },
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        images::{Column as ImageCol, Entity as Images},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel, Relation},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
    services::category_service,
};

/// Filters behind the product lookup endpoints.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
}

impl ProductFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(name) = &self.name {
            condition = condition.add(Column::Name.eq(name.as_str()));
        }
        if let Some(brand) = &self.brand {
            condition = condition.add(Column::Brand.eq(brand.as_str()));
        }
        if let Some(category) = &self.category {
            condition = condition.add(CategoryCol::Name.eq(category.as_str()));
        }
        condition
    }
}

pub async fn get_product_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> AppResult<ApiResponse<ProductDto>> {
    let product = match Products::find_by_id(id).one(db).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product not found!".into())),
    };
    let dto = to_dtos(db, vec![product]).await?.pop();
    match dto {
        Some(d) => Ok(ApiResponse::success("success", d)),
        None => Err(AppError::NotFound("Product not found!".into())),
    }
}

pub async fn find_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
) -> AppResult<Vec<ProductModel>> {
    let mut finder = Products::find();
    if filter.category.is_some() {
        finder = finder.join(JoinType::InnerJoin, Relation::Categories.def());
    }
    let products = finder
        .filter(filter.condition())
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(products)
}

/// List products matching `filter`; an empty result is reported as not found.
pub async fn list_products(
    db: &DatabaseConnection,
    filter: ProductFilter,
) -> AppResult<ApiResponse<ProductList>> {
    let products = find_products(db, &filter).await?;
    let unfiltered = filter.name.is_none() && filter.brand.is_none() && filter.category.is_none();
    if products.is_empty() && !unfiltered {
        return Err(AppError::NotFound("No products found".into()));
    }
    let items = to_dtos(db, products).await?;
    Ok(ApiResponse::success("success", ProductList { items }))
}

pub async fn count_by_brand_and_name(
    db: &DatabaseConnection,
    brand: &str,
    name: &str,
) -> AppResult<ApiResponse<u64>> {
    let count = Products::find()
        .filter(Column::Brand.eq(brand))
        .filter(Column::Name.eq(name))
        .count(db)
        .await?;
    Ok(ApiResponse::success("Product count!", count))
}

pub async fn add_product(
    db: &DatabaseConnection,
    user: &AuthUser,
    payload: AddProductRequest,
) -> AppResult<ApiResponse<ProductDto>> {
    ensure_admin(user)?;
    let txn = db.begin().await?;

    let exists = Products::find()
        .filter(Column::Name.eq(payload.name.as_str()))
        .filter(Column::Brand.eq(payload.brand.as_str()))
        .count(&txn)
        .await?
        > 0;
    if exists {
        return Err(AppError::AlreadyExists(format!(
            "{} {} already exists, you may update it!",
            payload.name, payload.brand
        )));
    }

    let category = category_service::find_or_create(&txn, &payload.category).await?;
    let product = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        brand: Set(payload.brand),
        price: Set(payload.price),
        inventory: Set(payload.inventory),
        description: Set(payload.description),
        category_id: Set(Some(category.id)),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(product_id = product.id, "product created");
    Ok(ApiResponse::success(
        "Add product success!",
        product_dto(product, Some(category.into()), Vec::new()),
    ))
}

pub async fn update_product(
    db: &DatabaseConnection,
    user: &AuthUser,
    id: i64,
    payload: ProductUpdateRequest,
) -> AppResult<ApiResponse<ProductDto>> {
    ensure_admin(user)?;
    let existing = match Products::find_by_id(id).one(db).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product not found!".into())),
    };
    let category = category_service::find_by_name(db, &payload.category).await?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.brand = Set(payload.brand);
    active.price = Set(payload.price);
    active.inventory = Set(payload.inventory);
    active.description = Set(payload.description);
    active.category_id = Set(category.map(|c| c.id));
    let product = active.update(db).await?;

    let dto = to_dtos(db, vec![product]).await?.pop();
    match dto {
        Some(d) => Ok(ApiResponse::success("Update product success!", d)),
        None => Err(AppError::NotFound("Product not found!".into())),
    }
}

pub async fn delete_product(
    db: &DatabaseConnection,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<i64>> {
    ensure_admin(user)?;
    let ordered = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(db)
        .await?;
    if ordered > 0 {
        return Err(AppError::Conflict(
            "Product is part of existing orders and cannot be deleted".into(),
        ));
    }

    let result = Products::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product not found!".into()));
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(ApiResponse::success("Delete product success!", id))
}

/// Attach categories and image links to a batch of products.
async fn to_dtos(
    db: &DatabaseConnection,
    products: Vec<ProductModel>,
) -> AppResult<Vec<ProductDto>> {
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let category_ids: Vec<i64> = products.iter().filter_map(|p| p.category_id).collect();

    let categories: HashMap<i64, CategoryDto> = Categories::find()
        .filter(CategoryCol::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, CategoryDto::from(c)))
        .collect();

    let mut images: HashMap<i64, Vec<ImageDto>> = HashMap::new();
    let rows: Vec<(i64, String, String, i64)> = Images::find()
        .select_only()
        .columns([
            ImageCol::Id,
            ImageCol::FileName,
            ImageCol::DownloadUrl,
            ImageCol::ProductId,
        ])
        .filter(ImageCol::ProductId.is_in(ids))
        .order_by_asc(ImageCol::Id)
        .into_tuple()
        .all(db)
        .await?;
    for (id, file_name, download_url, product_id) in rows {
        images.entry(product_id).or_default().push(ImageDto {
            id,
            file_name,
            download_url,
        });
    }

    Ok(products
        .into_iter()
        .map(|p| {
            let category = p.category_id.and_then(|id| categories.get(&id).cloned());
            let product_images = images.remove(&p.id).unwrap_or_default();
            product_dto(p, category, product_images)
        })
        .collect())
}

fn product_dto(
    model: ProductModel,
    category: Option<CategoryDto>,
    images: Vec<ImageDto>,
) -> ProductDto {
    ProductDto {
        id: model.id,
        name: model.name,
        brand: model.brand,
        price: model.price,
        inventory: model.inventory,
        description: model.description,
        category,
        images,
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QuerySelect, QueryTrait, RelationTrait};
    use sea_orm::JoinType;

    use super::ProductFilter;
    use crate::entity::products::{Entity as Products, Relation};

    #[test]
    fn brand_and_name_filter_targets_both_columns() {
        let filter = ProductFilter {
            name: Some("Phone".into()),
            brand: Some("Acme".into()),
            category: None,
        };
        let sql = Products::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""products"."name" = 'Phone'"#), "{sql}");
        assert!(sql.contains(r#""products"."brand" = 'Acme'"#), "{sql}");
    }

    #[test]
    fn category_filter_matches_category_name() {
        let filter = ProductFilter {
            category: Some("Electronics".into()),
            ..Default::default()
        };
        let sql = Products::find()
            .join(JoinType::InnerJoin, Relation::Categories.def())
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"INNER JOIN "categories""#), "{sql}");
        assert!(sql.contains(r#""categories"."name" = 'Electronics'"#), "{sql}");
    }
}
