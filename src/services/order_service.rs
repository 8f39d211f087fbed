use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};

use crate::{
    dto::orders::{OrderDto, OrderItemDto, OrderList},
    entity::{
        cart_items::{Column as CartItemCol, Entity as CartItems, Model as CartItemModel},
        carts::{Column as CartCol, Entity as Carts},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
            OrderStatus,
        },
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    response::ApiResponse,
    services::cart_service,
};

/// Quantity and price captured from a cart line at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

pub fn order_lines(items: &[CartItemModel]) -> Vec<OrderLine> {
    items
        .iter()
        .map(|item| OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.unit_price.unwrap_or(Decimal::ZERO),
        })
        .collect()
}

pub fn order_total(lines: &[OrderLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum()
}

/// Turn the user's cart into a pending order, decrement inventory and drop the cart.
pub async fn place_order(
    db: &DatabaseConnection,
    user: &AuthUser,
    user_id: i64,
) -> AppResult<ApiResponse<OrderDto>> {
    ensure_owner_or_admin(user, user_id)?;
    let txn = db.begin().await?;

    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::NotFound("Cart not found".into())),
    };

    let items = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .order_by_asc(CartItemCol::Id)
        .all(&txn)
        .await?;
    let lines = order_lines(&items);
    let total_amount = order_total(&lines);

    let order = OrderActive {
        id: NotSet,
        user_id: Set(cart.user_id),
        order_date: Set(Utc::now().date_naive()),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending),
    }
    .insert(&txn)
    .await?;

    let product_ids: Vec<i64> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<i64, ProductModel> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut order_items = Vec::with_capacity(lines.len());
    for line in &lines {
        if let Some(product) = products.get(&line.product_id) {
            if product.inventory < line.quantity {
                tracing::warn!(
                    product_id = product.id,
                    inventory = product.inventory,
                    quantity = line.quantity,
                    "order drives inventory below zero"
                );
            }
        }

        Products::update_many()
            .col_expr(
                ProdCol::Inventory,
                Expr::col(ProdCol::Inventory).sub(line.quantity),
            )
            .filter(ProdCol::Id.eq(line.product_id))
            .exec(&txn)
            .await?;

        let item = OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            price: Set(line.price),
        }
        .insert(&txn)
        .await?;
        order_items.push((item, products.get(&line.product_id).cloned()));
    }

    cart_service::delete_cart(&txn, cart.id).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id,
        total = %order.total_amount,
        "order placed"
    );

    Ok(ApiResponse::success(
        "Item Order Success!",
        order_dto(order, order_items),
    ))
}

pub async fn get_order(
    db: &DatabaseConnection,
    user: &AuthUser,
    order_id: i64,
) -> AppResult<ApiResponse<OrderDto>> {
    let order = match Orders::find_by_id(order_id).one(db).await? {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    ensure_owner_or_admin(user, order.user_id)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(Products)
        .all(db)
        .await?;

    Ok(ApiResponse::success("Item Order Success!", order_dto(order, items)))
}

pub async fn get_user_orders(
    db: &DatabaseConnection,
    user: &AuthUser,
    user_id: i64,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_owner_or_admin(user, user_id)?;
    let items = orders_for_user(db, user_id).await?;
    Ok(ApiResponse::success("Item Order Success!", OrderList { items }))
}

/// All orders of a user with their lines, newest first.
pub async fn orders_for_user<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<Vec<OrderDto>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .order_by_desc(OrderCol::Id)
        .all(db)
        .await?;
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut grouped: HashMap<i64, Vec<(OrderItemModel, Option<ProductModel>)>> = HashMap::new();
    for (item, product) in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(Products)
        .all(db)
        .await?
    {
        grouped.entry(item.order_id).or_default().push((item, product));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = grouped.remove(&order.id).unwrap_or_default();
            order_dto(order, items)
        })
        .collect())
}

pub async fn update_order_status(
    db: &DatabaseConnection,
    user: &AuthUser,
    order_id: i64,
    status: OrderStatus,
) -> AppResult<ApiResponse<OrderDto>> {
    ensure_admin(user)?;
    let txn = db.begin().await?;

    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".into())),
    };

    if !order.status.can_transition_to(status) {
        return Err(AppError::BadRequest(format!(
            "cannot move order from {:?} to {:?}",
            order.status, status
        )));
    }

    let previous = order.status;
    let mut active: OrderActive = order.into();
    active.status = Set(status);
    let order = active.update(&txn).await?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(Products)
        .all(&txn)
        .await?;
    txn.commit().await?;

    tracing::info!(order_id, from = ?previous, to = ?status, "order status updated");
    Ok(ApiResponse::success("Order updated", order_dto(order, items)))
}

fn order_dto(order: OrderModel, items: Vec<(OrderItemModel, Option<ProductModel>)>) -> OrderDto {
    OrderDto {
        id: order.id,
        user_id: order.user_id,
        order_date: order.order_date,
        total_amount: order.total_amount,
        status: order.status,
        items: items
            .into_iter()
            .map(|(item, product)| order_item_dto(item, product))
            .collect(),
    }
}

fn order_item_dto(item: OrderItemModel, product: Option<ProductModel>) -> OrderItemDto {
    let (product_name, product_brand) = product
        .map(|p| (p.name, p.brand))
        .unwrap_or_default();
    OrderItemDto {
        product_id: item.product_id,
        product_name,
        product_brand,
        quantity: item.quantity,
        price: item.price,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{OrderLine, order_lines, order_total};
    use crate::{entity::cart_items::Model as CartItemModel, services::cart_service::line_total};

    fn cart_item(product_id: i64, unit_price: Decimal, quantity: i32) -> CartItemModel {
        CartItemModel {
            id: product_id * 10,
            cart_id: 1,
            product_id,
            quantity,
            unit_price: Some(unit_price),
            total_price: line_total(Some(unit_price), quantity),
        }
    }

    #[test]
    fn order_total_sums_snapshot_lines() {
        let items = vec![
            cart_item(1, Decimal::from(10), 2),
            cart_item(2, Decimal::from(5), 1),
        ];
        let lines = order_lines(&items);
        assert_eq!(
            lines,
            vec![
                OrderLine { product_id: 1, quantity: 2, price: Decimal::from(10) },
                OrderLine { product_id: 2, quantity: 1, price: Decimal::from(5) },
            ]
        );
        assert_eq!(order_total(&lines), Decimal::from(25));
    }

    #[test]
    fn snapshot_prices_ignore_later_changes() {
        let mut items = vec![cart_item(1, Decimal::new(1250, 2), 2)];
        let lines = order_lines(&items);
        items[0].unit_price = Some(Decimal::from(99));
        assert_eq!(lines[0].price, Decimal::new(1250, 2));
        assert_eq!(order_total(&lines), Decimal::from(25));
    }

    #[test]
    fn unpriced_lines_contribute_nothing() {
        let mut item = cart_item(3, Decimal::ONE, 4);
        item.unit_price = None;
        let lines = order_lines(&[item]);
        assert_eq!(lines[0].price, Decimal::ZERO);
        assert_eq!(order_total(&lines), Decimal::ZERO);
    }
}
