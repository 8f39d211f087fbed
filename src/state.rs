use sea_orm::DatabaseConnection;

use crate::services::auth_service::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub jwt: JwtKeys,
    pub api_prefix: String,
}
