use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemQuery {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityQuery {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartDto {
    pub cart_id: i64,
    pub user_id: i64,
    pub items: Vec<CartItemDto>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub item_id: i64,
    pub quantity: i32,
    #[schema(value_type = Option<String>)]
    pub unit_price: Option<Decimal>,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub product: CartProduct,
}

/// Product fields shown next to a cart line.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartProduct {
    pub id: i64,
    pub name: String,
    pub brand: String,
    #[schema(value_type = String)]
    pub price: Decimal,
}
