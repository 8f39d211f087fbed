mod common;

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use dreamshops_api::{
    entity::{
        carts::Entity as Carts,
        orders::OrderStatus,
        products::{ActiveModel as ProductActive, Entity as Products},
    },
    error::AppError,
    services::{cart_service, order_service},
};

// One flow per file: the tables are truncated on setup.
#[tokio::test]
async fn cart_checkout_and_status_flow() -> anyhow::Result<()> {
    let Some(db) = common::setup_db().await? else {
        return Ok(());
    };

    let user = common::create_user(&db, "user1@email.com", false).await?;
    let other = common::create_user(&db, "user2@email.com", false).await?;
    let admin = common::create_user(&db, "admin1@email.com", true).await?;

    let a = common::create_product(&db, "Widget", Decimal::from(10), 10).await?;
    let b = common::create_product(&db, "Gadget", Decimal::from(5), 3).await?;

    // Placing an order without a cart fails.
    let err = order_service::place_order(&db, &user, user.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    let cart = cart_service::initialize_new_cart(&db, user.user_id).await?;
    let again = cart_service::initialize_new_cart(&db, user.user_id).await?;
    assert_eq!(cart.id, again.id);

    // Adding the same product twice merges into one line.
    cart_service::add_item(&db, &user, cart.id, a.id, 1).await?;
    let resp = cart_service::add_item(&db, &user, cart.id, a.id, 1).await?;
    let dto = resp.data.expect("cart");
    assert_eq!(dto.items.len(), 1);
    assert_eq!(dto.items[0].quantity, 2);
    assert_eq!(dto.total_amount, Decimal::from(20));

    let resp = cart_service::add_item(&db, &user, cart.id, b.id, 1).await?;
    assert_eq!(resp.data.expect("cart").total_amount, Decimal::from(25));

    let err = cart_service::add_item(&db, &user, cart.id, b.id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    let err = cart_service::get_cart(&db, &other, cart.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    let missing = common::create_product(&db, "Unused", Decimal::ONE, 1).await?;
    let err = cart_service::remove_item(&db, &user, cart.id, missing.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    // Updating a product that is not in the cart leaves it as is.
    let resp = cart_service::update_item_quantity(&db, &user, cart.id, missing.id, 4).await?;
    assert_eq!(resp.data.expect("cart").total_amount, Decimal::from(25));

    let total = cart_service::get_total_price(&db, &user, cart.id).await?;
    assert_eq!(total.data, Some(Decimal::from(25)));

    let resp = order_service::place_order(&db, &user, user.user_id).await?;
    let order = resp.data.expect("order");
    assert_eq!(order.total_amount, Decimal::from(25));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);

    let a_after = Products::find_by_id(a.id).one(&db).await?.expect("product a");
    let b_after = Products::find_by_id(b.id).one(&db).await?.expect("product b");
    assert_eq!(a_after.inventory, 8);
    assert_eq!(b_after.inventory, 2);
    assert!(Carts::find_by_id(cart.id).one(&db).await?.is_none());

    let orders = order_service::get_user_orders(&db, &user, user.user_id).await?;
    assert_eq!(orders.data.expect("orders").items.len(), 1);

    let err = order_service::get_order(&db, &other, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    let err = order_service::update_order_status(&db, &user, order.id, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    let err = order_service::update_order_status(&db, &admin, order.id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    let resp =
        order_service::update_order_status(&db, &admin, order.id, OrderStatus::Processing).await?;
    assert_eq!(resp.data.expect("order").status, OrderStatus::Processing);

    // Updating a line reprices it at the current product price.
    let other_cart = cart_service::initialize_new_cart(&db, other.user_id).await?;
    cart_service::add_item(&db, &other, other_cart.id, a.id, 1).await?;
    set_price(&db, a.id, Decimal::from(12)).await?;

    let resp = cart_service::update_item_quantity(&db, &other, other_cart.id, a.id, 3).await?;
    let dto = resp.data.expect("cart");
    assert_eq!(dto.items.len(), 1);
    assert_eq!(dto.items[0].quantity, 3);
    assert_eq!(dto.items[0].unit_price, Some(Decimal::from(12)));
    assert_eq!(dto.items[0].total_price, Decimal::from(36));
    assert_eq!(dto.total_amount, Decimal::from(36));

    let resp = order_service::place_order(&db, &other, other.user_id).await?;
    let order = resp.data.expect("order");
    assert_eq!(order.total_amount, Decimal::from(36));

    // Order lines keep the price paid, whatever the catalog does later.
    set_price(&db, a.id, Decimal::from(99)).await?;
    let resp = order_service::get_order(&db, &other, order.id).await?;
    let stored = resp.data.expect("order");
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].price, Decimal::from(12));
    assert_eq!(stored.items[0].quantity, 3);
    assert_eq!(stored.total_amount, Decimal::from(36));

    let a_after = Products::find_by_id(a.id).one(&db).await?.expect("product a");
    assert_eq!(a_after.inventory, 5);

    Ok(())
}

async fn set_price(
    db: &sea_orm::DatabaseConnection,
    product_id: i64,
    price: Decimal,
) -> anyhow::Result<()> {
    let product = Products::find_by_id(product_id).one(db).await?.expect("product");
    let mut active: ProductActive = product.into();
    active.price = Set(price);
    active.update(db).await?;
    Ok(())
}
