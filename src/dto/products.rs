use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::{categories::CategoryDto, images::ImageDto};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductRequest {
    pub name: String,
    pub brand: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub inventory: i32,
    pub description: Option<String>,
    /// Category name; created when it does not exist yet.
    pub category: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductUpdateRequest {
    pub name: String,
    pub brand: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub inventory: i32,
    pub description: Option<String>,
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub brand: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub inventory: i32,
    pub description: Option<String>,
    pub category: Option<CategoryDto>,
    pub images: Vec<ImageDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductDto>)]
    pub items: Vec<ProductDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BrandAndNameQuery {
    pub brand: String,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryAndBrandQuery {
    pub category: String,
    pub brand: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BrandQuery {
    pub brand: String,
}
