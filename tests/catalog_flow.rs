mod common;

use rust_decimal::Decimal;

use dreamshops_api::{
    dto::categories::CategoryRequest,
    error::AppError,
    services::{cart_service, category_service, order_service, product_service},
};

#[tokio::test]
async fn catalog_conflicts_are_reported_as_409() -> anyhow::Result<()> {
    let Some(db) = common::setup_db().await? else {
        return Ok(());
    };
    let admin = common::create_user(&db, "admin1@email.com", true).await?;
    let user = common::create_user(&db, "user1@email.com", false).await?;

    let books = category_service::add_category(&db, &admin, named("Books"))
        .await?
        .data
        .expect("category");
    let games = category_service::add_category(&db, &admin, named("Games"))
        .await?
        .data
        .expect("category");
    assert_ne!(books.id, games.id);

    let err = category_service::add_category(&db, &admin, named("Books"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)), "{err:?}");

    // Renaming onto an existing name trips the unique index.
    let err = category_service::update_category(&db, &admin, games.id, named("Books"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)), "{err:?}");
    assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);

    let err = category_service::update_category(&db, &user, games.id, named("Toys"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    // Ordered products stay in the catalog.
    let ordered = common::create_product(&db, "Novel", Decimal::from(8), 5).await?;
    let spare = common::create_product(&db, "Atlas", Decimal::from(30), 5).await?;
    let cart = cart_service::initialize_new_cart(&db, user.user_id).await?;
    cart_service::add_item(&db, &user, cart.id, ordered.id, 1).await?;
    order_service::place_order(&db, &user, user.user_id).await?;

    let err = product_service::delete_product(&db, &admin, ordered.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);

    let resp = product_service::delete_product(&db, &admin, spare.id).await?;
    assert_eq!(resp.data, Some(spare.id));

    let err = product_service::delete_product(&db, &admin, spare.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    Ok(())
}

fn named(name: &str) -> CategoryRequest {
    CategoryRequest {
        name: name.to_string(),
    }
}
