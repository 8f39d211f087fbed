use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;

use crate::{
    dto::cart::{AddItemQuery, CartDto, UpdateQuantityQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn carts_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/my-cart", get(get_cart))
        .route("/{id}/clear", delete(clear_cart))
        .route("/{id}/cart/total-price", get(get_total_amount))
}

pub fn cart_items_router() -> Router<AppState> {
    Router::new()
        .route("/item/add", post(add_item_to_cart))
        .route(
            "/cart/{cart_id}/item/{product_id}/remove",
            delete(remove_item_from_cart),
        )
        .route(
            "/cart/{cart_id}/item/{product_id}/update",
            put(update_item_quantity),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/carts/{id}/my-cart",
    params(("id" = i64, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart with items", body = ApiResponse<CartDto>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<CartDto>>> {
    Ok(Json(cart_service::get_cart(&state.orm, &user, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/carts/{id}/clear",
    params(("id" = i64, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart removed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    Ok(Json(cart_service::clear_cart(&state.orm, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/carts/{id}/cart/total-price",
    params(("id" = i64, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart total", body = ApiResponse<String>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_total_amount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Decimal>>> {
    Ok(Json(cart_service::get_total_price(&state.orm, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/cartItems/item/add",
    params(
        ("product_id" = i64, Query, description = "Product ID"),
        ("quantity" = i32, Query, description = "Quantity to add")
    ),
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AddItemQuery>,
) -> AppResult<Json<ApiResponse<CartDto>>> {
    let cart = cart_service::initialize_new_cart(&state.orm, user.user_id).await?;
    let resp =
        cart_service::add_item(&state.orm, &user, cart.id, query.product_id, query.quantity)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cartItems/cart/{cart_id}/item/{product_id}/remove",
    params(
        ("cart_id" = i64, Path, description = "Cart ID"),
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartDto>),
        (status = 404, description = "Cart or item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path((cart_id, product_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<CartDto>>> {
    Ok(Json(
        cart_service::remove_item(&state.orm, &user, cart_id, product_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/cartItems/cart/{cart_id}/item/{product_id}/update",
    params(
        ("cart_id" = i64, Path, description = "Cart ID"),
        ("product_id" = i64, Path, description = "Product ID"),
        ("quantity" = i32, Query, description = "New quantity")
    ),
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartDto>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_item_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path((cart_id, product_id)): Path<(i64, i64)>,
    Query(query): Query<UpdateQuantityQuery>,
) -> AppResult<Json<ApiResponse<CartDto>>> {
    let resp = cart_service::update_item_quantity(
        &state.orm,
        &user,
        cart_id,
        product_id,
        query.quantity,
    )
    .await?;
    Ok(Json(resp))
}
