use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::users::{CreateUserRequest, UserDto, UserUpdateRequest},
    entity::{
        roles::{Column as RoleCol, Entity as Roles, ROLE_USER},
        user_roles::ActiveModel as UserRoleActive,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    response::ApiResponse,
    services::{cart_service, order_service},
};

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<UserModel>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(db)
        .await?;
    Ok(user)
}

pub async fn role_names<C: ConnectionTrait>(db: &C, user: &UserModel) -> AppResult<Vec<String>> {
    let roles = user
        .find_related(Roles)
        .all(db)
        .await?
        .into_iter()
        .map(|role| role.name)
        .collect();
    Ok(roles)
}

pub async fn principal_for<C: ConnectionTrait>(db: &C, user: UserModel) -> AppResult<AuthUser> {
    let roles = role_names(db, &user).await?;
    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        roles,
    })
}

/// Resolve a token subject to a principal with its current roles.
pub async fn load_principal<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<AuthUser>> {
    match find_by_email(db, email).await? {
        Some(user) => Ok(Some(principal_for(db, user).await?)),
        None => Ok(None),
    }
}

pub async fn get_user_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<UserModel> {
    match Users::find_by_id(id).one(db).await? {
        Some(u) => Ok(u),
        None => Err(AppError::NotFound("User not found!".into())),
    }
}

/// Insert a user with the given roles. Fails when the email is taken.
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    payload: CreateUserRequest,
    roles: &[&str],
) -> AppResult<UserModel> {
    let exists = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .count(db)
        .await?
        > 0;
    if exists {
        return Err(AppError::AlreadyExists(format!(
            "{} already exists!",
            payload.email
        )));
    }

    let password = super::auth_service::hash_password(&payload.password)?;
    let user = UserActive {
        id: NotSet,
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email: Set(payload.email),
        password: Set(password),
    }
    .insert(db)
    .await?;

    if !roles.is_empty() {
        let found = Roles::find()
            .filter(RoleCol::Name.is_in(roles.iter().copied()))
            .all(db)
            .await?;
        for role in found {
            UserRoleActive {
                user_id: Set(user.id),
                role_id: Set(role.id),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(user)
}

pub async fn user_dto<C: ConnectionTrait>(db: &C, user: UserModel) -> AppResult<UserDto> {
    let roles = role_names(db, &user).await?;
    let orders = order_service::orders_for_user(db, user.id).await?;
    let cart = match cart_service::get_cart_by_user_id(db, user.id).await? {
        Some(cart) => Some(cart_service::cart_dto(db, cart).await?),
        None => None,
    };
    Ok(UserDto {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        roles,
        orders,
        cart,
    })
}

pub async fn get_user(
    db: &sea_orm::DatabaseConnection,
    auth: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<UserDto>> {
    ensure_owner_or_admin(auth, id)?;
    let user = get_user_by_id(db, id).await?;
    Ok(ApiResponse::success("Success", user_dto(db, user).await?))
}

pub async fn create_user(
    db: &sea_orm::DatabaseConnection,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<UserDto>> {
    let txn = db.begin().await?;
    let user = insert_user(&txn, payload, &[ROLE_USER]).await?;
    let dto = user_dto(&txn, user).await?;
    txn.commit().await?;

    tracing::info!(user_id = dto.id, "user created");
    Ok(ApiResponse::success("Create User Success!", dto))
}

pub async fn update_user(
    db: &sea_orm::DatabaseConnection,
    auth: &AuthUser,
    id: i64,
    payload: UserUpdateRequest,
) -> AppResult<ApiResponse<UserDto>> {
    ensure_owner_or_admin(auth, id)?;
    let existing = get_user_by_id(db, id).await?;

    let mut active: UserActive = existing.into();
    active.first_name = Set(payload.first_name);
    active.last_name = Set(payload.last_name);
    let user = active.update(db).await?;

    Ok(ApiResponse::success("Update User Success!", user_dto(db, user).await?))
}

pub async fn delete_user(
    db: &sea_orm::DatabaseConnection,
    auth: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<()>> {
    ensure_owner_or_admin(auth, id)?;
    let result = Users::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found!".into()));
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(ApiResponse::empty("Delete User Success!"))
}
