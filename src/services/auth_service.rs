use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use sea_orm::DatabaseConnection;

use crate::{
    dto::auth::{Claims, JwtResponse, LoginRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::user_service,
};

/// Signing material for access tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration: Duration,
}

impl JwtKeys {
    /// Build keys from a base64 encoded shared secret.
    pub fn from_base64_secret(secret: &str, expiration_ms: i64) -> AppResult<Self> {
        let encoding = EncodingKey::from_base64_secret(secret)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid JWT secret: {e}")))?;
        let decoding = DecodingKey::from_base64_secret(secret)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid JWT secret: {e}")))?;
        Ok(Self {
            encoding,
            decoding,
            expiration: Duration::milliseconds(expiration_ms),
        })
    }

    pub fn issue_token(&self, principal: &AuthUser) -> AppResult<String> {
        self.issue_token_at(principal, Utc::now())
    }

    pub fn issue_token_at(
        &self,
        principal: &AuthUser,
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let expires_at = issued_at
            .checked_add_signed(self.expiration)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: principal.email.clone(),
            id: principal.user_id,
            roles: principal.roles.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Verify signature and expiry and return the embedded claims.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::AuthToken(e.to_string()))
    }

    pub fn subject(&self, token: &str) -> AppResult<String> {
        self.validate_token(token).map(|claims| claims.sub)
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn login_user(
    db: &DatabaseConnection,
    keys: &JwtKeys,
    payload: LoginRequest,
) -> AppResult<ApiResponse<JwtResponse>> {
    let LoginRequest { email, password } = payload;
    let user = match user_service::find_by_email(db, &email).await? {
        Some(u) => u,
        None => return Err(AppError::Unauthorized),
    };

    if !verify_password(&password, &user.password)? {
        tracing::debug!(email = %email, "rejected login with bad credentials");
        return Err(AppError::Unauthorized);
    }

    let principal = user_service::principal_for(db, user).await?;
    let token = keys.issue_token(&principal)?;
    tracing::info!(user_id = principal.user_id, "user logged in");

    Ok(ApiResponse::success(
        "Logged in successfully",
        JwtResponse {
            id: principal.user_id,
            token,
        },
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{JwtKeys, hash_password, verify_password};
    use crate::{error::AppError, middleware::auth::AuthUser};

    // base64 of "a-shared-secret-that-is-long-enough-for-hs256!!"
    const SECRET: &str = "YS1zaGFyZWQtc2VjcmV0LXRoYXQtaXMtbG9uZy1lbm91Z2gtZm9yLWhzMjU2ISE=";

    fn principal() -> AuthUser {
        AuthUser {
            user_id: 7,
            email: "user7@email.com".into(),
            roles: vec!["ROLE_USER".into()],
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::from_base64_secret(SECRET, 60 * 60 * 1000).unwrap()
    }

    #[test]
    fn token_round_trips_claims() {
        let keys = keys();
        let token = keys.issue_token(&principal()).unwrap();
        let claims = keys.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user7@email.com");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.roles, vec!["ROLE_USER".to_string()]);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(keys.subject(&token).unwrap(), "user7@email.com");
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let issued = Utc::now() - Duration::hours(2);
        let token = keys.issue_token_at(&principal(), issued).unwrap();
        assert!(matches!(keys.validate_token(&token), Err(AppError::AuthToken(_))));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let keys = keys();
        let token = keys.issue_token(&principal()).unwrap();
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{head}.{flipped}{}", &sig[1..]);
        assert!(matches!(keys.validate_token(&tampered), Err(AppError::AuthToken(_))));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = JwtKeys::from_base64_secret(
            "b3RoZXItc2VjcmV0LWZvci10ZXN0aW5nLXB1cnBvc2VzLW9ubHk=",
            60_000,
        )
        .unwrap();
        let token = other.issue_token(&principal()).unwrap();
        assert!(matches!(keys().validate_token(&token), Err(AppError::AuthToken(_))));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(keys().validate_token("not.a.jwt"), Err(AppError::AuthToken(_))));
    }

    #[test]
    fn hashed_password_differs_from_plaintext_and_verifies() {
        let hash = hash_password("123456").unwrap();
        assert_ne!(hash, "123456");
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
    }
}
