mod common;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use dreamshops_api::{
    entity::carts::{Column as CartCol, Entity as Carts},
    services::cart_service,
};

// Two first-time add-to-cart calls per user must share one cart.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_adds_share_one_cart() -> anyhow::Result<()> {
    let Some(db) = common::setup_db().await? else {
        return Ok(());
    };
    let product = common::create_product(&db, "Widget", Decimal::from(10), 100).await?;

    let mut users = Vec::new();
    for i in 0..10 {
        users.push(common::create_user(&db, &format!("racer{i}@email.com"), false).await?);
    }

    let mut handles = Vec::new();
    for user in &users {
        for _ in 0..2 {
            let db = db.clone();
            let user = user.clone();
            let product_id = product.id;
            handles.push(tokio::spawn(async move {
                let cart = cart_service::initialize_new_cart(&db, user.user_id).await?;
                cart_service::add_item(&db, &user, cart.id, product_id, 1).await
            }));
        }
    }
    for handle in handles {
        handle.await??;
    }

    for user in &users {
        let carts = Carts::find()
            .filter(CartCol::UserId.eq(user.user_id))
            .count(&db)
            .await?;
        assert_eq!(carts, 1);

        let cart = cart_service::get_cart_by_user_id(&db, user.user_id)
            .await?
            .expect("cart");
        let resp = cart_service::get_cart(&db, user, cart.id).await?;
        let dto = resp.data.expect("cart");
        assert_eq!(dto.items.len(), 1);
        assert_eq!(dto.items[0].quantity, 2);
        assert_eq!(dto.total_amount, Decimal::from(20));
    }

    Ok(())
}
