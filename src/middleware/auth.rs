use axum::{extract::FromRequestParts, http::header};

use crate::{
    entity::roles::ROLE_ADMIN,
    error::AppError,
    services::user_service,
    state::AppState,
};

/// Authenticated principal resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if !user.has_role(role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

/// Admins may act on any user's resources, everyone else only on their own.
pub fn ensure_owner_or_admin(user: &AuthUser, owner_id: i64) -> Result<(), AppError> {
    if user.user_id == owner_id || user.is_admin() {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

pub(crate) fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::AuthToken("Invalid Authorization header".into()))?;

        let token = bearer_token(auth_str).ok_or(AppError::Unauthorized)?;
        let email = state.jwt.subject(token)?;

        match user_service::load_principal(&state.orm, &email).await? {
            Some(principal) => Ok(principal),
            None => Err(AppError::AuthToken("Unknown token subject".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthUser, bearer_token, ensure_admin, ensure_owner_or_admin};
    use crate::error::AppError;

    fn user(roles: &[&str]) -> AuthUser {
        AuthUser {
            user_id: 3,
            email: "user3@email.com".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn parses_bearer_scheme_only() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }

    #[test]
    fn admin_role_is_required_for_admin_actions() {
        assert!(ensure_admin(&user(&["ROLE_ADMIN"])).is_ok());
        assert!(matches!(ensure_admin(&user(&["ROLE_USER"])), Err(AppError::Forbidden)));
    }

    #[test]
    fn owners_and_admins_may_access() {
        assert!(ensure_owner_or_admin(&user(&["ROLE_USER"]), 3).is_ok());
        assert!(ensure_owner_or_admin(&user(&["ROLE_ADMIN"]), 99).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&user(&["ROLE_USER"]), 99),
            Err(AppError::Forbidden)
        ));
    }
}
