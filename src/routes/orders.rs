use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};

use crate::{
    dto::orders::{OrderDto, OrderList, PlaceOrderQuery, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(create_order))
        .route("/{id}/order", get(get_order_by_id))
        .route("/{id}/status", patch(update_order_status))
        .route("/user/{user_id}/orders", get(get_user_orders))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/order",
    params(("user_id" = i64, Query, description = "Owner of the cart to check out")),
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PlaceOrderQuery>,
) -> AppResult<Json<ApiResponse<OrderDto>>> {
    Ok(Json(
        order_service::place_order(&state.orm, &user, query.user_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/order",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderDto>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDto>>> {
    Ok(Json(order_service::get_order(&state.orm, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/user/{user_id}/orders",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Orders of the user", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_user_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(
        order_service::get_user_orders(&state.orm, &user, user_id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/status",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<OrderDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderDto>>> {
    Ok(Json(
        order_service::update_order_status(&state.orm, &user, id, payload.status).await?,
    ))
}
