mod common;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use dreamshops_api::{
    dto::{auth::LoginRequest, users::CreateUserRequest},
    entity::{
        roles::ROLE_USER,
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::AppError,
    services::{auth_service::{JwtKeys, login_user}, user_service},
};

const SECRET: &str = "YS1zaGFyZWQtc2VjcmV0LXRoYXQtaXMtbG9uZy1lbm91Z2gtZm9yLWhzMjU2ISE=";

#[tokio::test]
async fn register_login_and_duplicate_email() -> anyhow::Result<()> {
    let Some(db) = common::setup_db().await? else {
        return Ok(());
    };
    let keys = JwtKeys::from_base64_secret(SECRET, 3_600_000)?;

    let request = || CreateUserRequest {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@email.com".into(),
        password: "123456".into(),
    };

    let created = user_service::create_user(&db, request()).await?;
    let dto = created.data.expect("user");
    assert_eq!(dto.roles, vec![ROLE_USER.to_string()]);
    assert!(dto.cart.is_none());

    let stored = Users::find_by_id(dto.id).one(&db).await?.expect("stored user");
    assert_ne!(stored.password, "123456");

    let err = user_service::create_user(&db, request()).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)), "{err:?}");

    // A write that slips past the lookup still lands on the unique index.
    let err = UserActive {
        id: NotSet,
        first_name: Set("Jane".into()),
        last_name: Set("Again".into()),
        email: Set("jane@email.com".into()),
        password: Set("hash".into()),
    }
    .insert(&db)
    .await
    .map_err(AppError::from)
    .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)), "{err:?}");

    let login = login_user(
        &db,
        &keys,
        LoginRequest {
            email: "jane@email.com".into(),
            password: "123456".into(),
        },
    )
    .await?;
    let jwt = login.data.expect("token");
    assert_eq!(jwt.id, dto.id);
    let claims = keys.validate_token(&jwt.token)?;
    assert_eq!(claims.sub, "jane@email.com");
    assert_eq!(claims.id, dto.id);

    let err = login_user(
        &db,
        &keys,
        LoginRequest {
            email: "jane@email.com".into(),
            password: "wrong".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized), "{err:?}");

    let principal = user_service::load_principal(&db, "jane@email.com").await?;
    assert_eq!(principal.map(|p| p.user_id), Some(dto.id));

    Ok(())
}
