use anyhow::Context;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;

use dreamshops_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::users::CreateUserRequest,
    entity::roles::{
        ActiveModel as RoleActive, Column as RoleCol, Entity as Roles, ROLE_ADMIN, ROLE_USER,
    },
    services::user_service,
};

const DEFAULT_PASSWORD: &str = "123456";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    let db = create_orm_conn(pool);

    for role in [ROLE_ADMIN, ROLE_USER] {
        ensure_role(&db, role).await?;
    }

    let mut created = 0;
    for i in 1..=5 {
        created += ensure_user(
            &db,
            "The User",
            &format!("User{i}"),
            &format!("user{i}@email.com"),
            &[ROLE_USER],
        )
        .await?;
    }
    for i in 1..=2 {
        created += ensure_user(
            &db,
            "Admin",
            &format!("Admin{i}"),
            &format!("admin{i}@email.com"),
            &[ROLE_ADMIN],
        )
        .await?;
    }

    println!("Seed completed. {created} new users");
    Ok(())
}

async fn ensure_role(db: &DatabaseConnection, name: &str) -> anyhow::Result<()> {
    let existing = Roles::find().filter(RoleCol::Name.eq(name)).one(db).await?;
    if existing.is_none() {
        RoleActive {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn ensure_user(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
    roles: &[&str],
) -> anyhow::Result<usize> {
    if user_service::find_by_email(db, email).await?.is_some() {
        return Ok(0);
    }
    let payload = CreateUserRequest {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password: DEFAULT_PASSWORD.to_string(),
    };
    user_service::insert_user(db, payload, roles)
        .await
        .with_context(|| format!("seeding {email}"))?;
    Ok(1)
}
