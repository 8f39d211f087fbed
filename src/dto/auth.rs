use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JwtResponse {
    pub id: i64,
    pub token: String,
}

/// Access token payload. `sub` carries the user's email.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub id: i64,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}
