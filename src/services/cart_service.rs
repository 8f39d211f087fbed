use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{LockType, OnConflict};

use crate::{
    dto::cart::{CartDto, CartItemDto, CartProduct},
    entity::{
        cart_items::{
            ActiveModel as CartItemActive, Column as CartItemCol, Entity as CartItems,
            Model as CartItemModel,
        },
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    response::ApiResponse,
};

/// `unit_price * quantity`, with a missing price counting as zero.
pub fn line_total(unit_price: Option<Decimal>, quantity: i32) -> Decimal {
    unit_price
        .map(|price| price * Decimal::from(quantity))
        .unwrap_or(Decimal::ZERO)
}

/// Full re-sum of every line in the cart.
pub fn cart_total(items: &[CartItemModel]) -> Decimal {
    items
        .iter()
        .map(|item| line_total(item.unit_price, item.quantity))
        .sum()
}

fn ensure_positive(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

async fn lock_cart<C: ConnectionTrait>(db: &C, cart_id: i64) -> AppResult<CartModel> {
    let cart = Carts::find_by_id(cart_id)
        .lock(LockType::Update)
        .one(db)
        .await?;
    match cart {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound("Cart not found".into())),
    }
}

async fn find_product<C: ConnectionTrait>(db: &C, product_id: i64) -> AppResult<ProductModel> {
    match Products::find_by_id(product_id).one(db).await? {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound("Product not found!".into())),
    }
}

async fn find_item<C: ConnectionTrait>(
    db: &C,
    cart_id: i64,
    product_id: i64,
) -> AppResult<Option<CartItemModel>> {
    let item = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart_id))
        .filter(CartItemCol::ProductId.eq(product_id))
        .one(db)
        .await?;
    Ok(item)
}

/// Recompute and persist the cart total from its current items.
async fn refresh_total<C: ConnectionTrait>(db: &C, cart: CartModel) -> AppResult<CartModel> {
    let items = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .all(db)
        .await?;
    let total = cart_total(&items);

    let mut active: CartActive = cart.into();
    active.total_amount = Set(total);
    let cart = active.update(db).await?;
    Ok(cart)
}

pub async fn get_cart_model<C: ConnectionTrait>(db: &C, cart_id: i64) -> AppResult<CartModel> {
    match Carts::find_by_id(cart_id).one(db).await? {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound("Cart not found".into())),
    }
}

pub async fn get_cart_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> AppResult<Option<CartModel>> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .one(db)
        .await?;
    Ok(cart)
}

/// Return the user's cart, creating an empty one on first use.
/// Concurrent first calls for the same user all end up with the same row.
pub async fn initialize_new_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> AppResult<CartModel> {
    if let Some(cart) = get_cart_by_user_id(db, user_id).await? {
        return Ok(cart);
    }

    let inserted = Carts::insert(CartActive {
        id: NotSet,
        total_amount: Set(Decimal::ZERO),
        user_id: Set(user_id),
    })
    .on_conflict(OnConflict::column(CartCol::UserId).do_nothing().to_owned())
    .exec_without_returning(db)
    .await?;
    if inserted > 0 {
        tracing::debug!(user_id, "cart created");
    }

    match get_cart_by_user_id(db, user_id).await? {
        Some(cart) => Ok(cart),
        None => Err(AppError::NotFound("Cart not found".into())),
    }
}

pub async fn cart_dto<C: ConnectionTrait>(db: &C, cart: CartModel) -> AppResult<CartDto> {
    let rows = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .order_by_asc(CartItemCol::Id)
        .find_also_related(Products)
        .all(db)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(item, product)| product.map(|p| cart_item_dto(item, p)))
        .collect();

    Ok(CartDto {
        cart_id: cart.id,
        user_id: cart.user_id,
        items,
        total_amount: cart.total_amount,
    })
}

fn cart_item_dto(item: CartItemModel, product: ProductModel) -> CartItemDto {
    CartItemDto {
        item_id: item.id,
        quantity: item.quantity,
        unit_price: item.unit_price,
        total_price: item.total_price,
        product: CartProduct {
            id: product.id,
            name: product.name,
            brand: product.brand,
            price: product.price,
        },
    }
}

/// Delete every item of the cart and the cart row itself.
pub async fn delete_cart<C: ConnectionTrait>(db: &C, cart_id: i64) -> AppResult<()> {
    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart_id))
        .exec(db)
        .await?;
    let result = Carts::delete_by_id(cart_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Cart not found".into()));
    }
    Ok(())
}

pub async fn get_cart(
    db: &DatabaseConnection,
    user: &AuthUser,
    cart_id: i64,
) -> AppResult<ApiResponse<CartDto>> {
    let cart = get_cart_model(db, cart_id).await?;
    ensure_owner_or_admin(user, cart.user_id)?;
    Ok(ApiResponse::success("Success", cart_dto(db, cart).await?))
}

pub async fn get_total_price(
    db: &DatabaseConnection,
    user: &AuthUser,
    cart_id: i64,
) -> AppResult<ApiResponse<Decimal>> {
    let cart = get_cart_model(db, cart_id).await?;
    ensure_owner_or_admin(user, cart.user_id)?;
    Ok(ApiResponse::success("Total Price", cart.total_amount))
}

pub async fn clear_cart(
    db: &DatabaseConnection,
    user: &AuthUser,
    cart_id: i64,
) -> AppResult<ApiResponse<()>> {
    let txn = db.begin().await?;
    let cart = lock_cart(&txn, cart_id).await?;
    ensure_owner_or_admin(user, cart.user_id)?;
    delete_cart(&txn, cart.id).await?;
    txn.commit().await?;

    tracing::info!(cart_id, "cart cleared");
    Ok(ApiResponse::empty("Clear Cart Success!"))
}

/// Add `quantity` of a product, merging with an existing line for the same product.
pub async fn add_item(
    db: &DatabaseConnection,
    user: &AuthUser,
    cart_id: i64,
    product_id: i64,
    quantity: i32,
) -> AppResult<ApiResponse<CartDto>> {
    ensure_positive(quantity)?;
    let txn = db.begin().await?;
    let cart = lock_cart(&txn, cart_id).await?;
    ensure_owner_or_admin(user, cart.user_id)?;
    let product = find_product(&txn, product_id).await?;

    match find_item(&txn, cart.id, product.id).await? {
        Some(item) => {
            let quantity = item.quantity + quantity;
            let total_price = line_total(item.unit_price, quantity);
            let mut active: CartItemActive = item.into();
            active.quantity = Set(quantity);
            active.total_price = Set(total_price);
            active.update(&txn).await?;
        }
        None => {
            CartItemActive {
                id: NotSet,
                cart_id: Set(cart.id),
                product_id: Set(product.id),
                quantity: Set(quantity),
                unit_price: Set(Some(product.price)),
                total_price: Set(line_total(Some(product.price), quantity)),
            }
            .insert(&txn)
            .await?;
        }
    }

    let cart = refresh_total(&txn, cart).await?;
    let dto = cart_dto(&txn, cart).await?;
    txn.commit().await?;

    tracing::debug!(cart_id, product_id, quantity, "item added to cart");
    Ok(ApiResponse::success("Add Item Success", dto))
}

pub async fn remove_item(
    db: &DatabaseConnection,
    user: &AuthUser,
    cart_id: i64,
    product_id: i64,
) -> AppResult<ApiResponse<CartDto>> {
    let txn = db.begin().await?;
    let cart = lock_cart(&txn, cart_id).await?;
    ensure_owner_or_admin(user, cart.user_id)?;

    let item = match find_item(&txn, cart.id, product_id).await? {
        Some(i) => i,
        None => return Err(AppError::NotFound("Item not found".into())),
    };
    CartItems::delete_by_id(item.id).exec(&txn).await?;

    let cart = refresh_total(&txn, cart).await?;
    let dto = cart_dto(&txn, cart).await?;
    txn.commit().await?;

    tracing::debug!(cart_id, product_id, "item removed from cart");
    Ok(ApiResponse::success("Remove Item Success", dto))
}

/// Set the quantity of a line and reprice it at the product's current price.
/// A product that is not in the cart leaves the cart untouched.
pub async fn update_item_quantity(
    db: &DatabaseConnection,
    user: &AuthUser,
    cart_id: i64,
    product_id: i64,
    quantity: i32,
) -> AppResult<ApiResponse<CartDto>> {
    ensure_positive(quantity)?;
    let txn = db.begin().await?;
    let cart = lock_cart(&txn, cart_id).await?;
    ensure_owner_or_admin(user, cart.user_id)?;

    match find_item(&txn, cart.id, product_id).await? {
        Some(item) => {
            let unit_price = Products::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .map(|p| p.price);
            let mut active: CartItemActive = item.into();
            active.quantity = Set(quantity);
            active.unit_price = Set(unit_price);
            active.total_price = Set(line_total(unit_price, quantity));
            active.update(&txn).await?;
        }
        None => {
            tracing::debug!(cart_id, product_id, "quantity update for product not in cart ignored");
        }
    }

    let cart = refresh_total(&txn, cart).await?;
    let dto = cart_dto(&txn, cart).await?;
    txn.commit().await?;

    Ok(ApiResponse::success("Update Item Success", dto))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{cart_total, line_total};
    use crate::entity::cart_items::Model as CartItemModel;

    fn item(id: i64, unit_price: Option<Decimal>, quantity: i32) -> CartItemModel {
        CartItemModel {
            id,
            cart_id: 1,
            product_id: id,
            quantity,
            unit_price,
            total_price: line_total(unit_price, quantity),
        }
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(line_total(Some(Decimal::new(1999, 2)), 3), Decimal::new(5997, 2));
    }

    #[test]
    fn missing_unit_price_counts_as_zero() {
        assert_eq!(line_total(None, 4), Decimal::ZERO);
        let items = vec![item(1, None, 4), item(2, Some(Decimal::from(5)), 2)];
        assert_eq!(cart_total(&items), Decimal::from(10));
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_tracks_every_mutation() {
        let mut items = vec![item(1, Some(Decimal::from(10)), 2)];
        assert_eq!(cart_total(&items), Decimal::from(20));

        items.push(item(2, Some(Decimal::new(550, 2)), 1));
        assert_eq!(cart_total(&items), Decimal::new(2550, 2));

        items[0].quantity = 5;
        assert_eq!(cart_total(&items), Decimal::new(5550, 2));

        items.remove(1);
        assert_eq!(cart_total(&items), Decimal::from(50));
        assert_eq!(
            cart_total(&items),
            items.iter().map(|i| line_total(i.unit_price, i.quantity)).sum::<Decimal>()
        );
    }
}
