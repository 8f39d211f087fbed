#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};

use dreamshops_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::users::CreateUserRequest,
    entity::{
        products::{ActiveModel as ProductActive, Model as ProductModel},
        roles::{ROLE_ADMIN, ROLE_USER},
    },
    middleware::auth::AuthUser,
    services::user_service,
};

/// Connect to the test database, or `None` when no URL is configured.
pub async fn setup_db() -> anyhow::Result<Option<DatabaseConnection>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    let db = create_orm_conn(pool);

    // Clean tables between runs; roles are seeded by the migration and kept.
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart_items, carts, images, products, categories, user_roles, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(Some(db))
}

pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    admin: bool,
) -> anyhow::Result<AuthUser> {
    let role = if admin { ROLE_ADMIN } else { ROLE_USER };
    let user = user_service::insert_user(
        db,
        CreateUserRequest {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.to_string(),
            password: "123456".into(),
        },
        &[role],
    )
    .await?;
    Ok(user_service::principal_for(db, user).await?)
}

pub async fn create_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    inventory: i32,
) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: NotSet,
        name: Set(name.to_string()),
        brand: Set("Acme".into()),
        price: Set(price),
        inventory: Set(inventory),
        description: Set(None),
        category_id: Set(None),
    }
    .insert(db)
    .await?;
    Ok(product)
}
