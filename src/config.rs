use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub jwt_secret: String,
    pub jwt_expiration_ms: i64,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let api_prefix = env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string());
        let jwt_expiration_ms = env::var("JWT_EXPIRATION_MS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(3_600_000);
        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5 * 1024 * 1024);
        Ok(Self {
            port,
            database_url,
            host,
            api_prefix,
            jwt_secret,
            jwt_expiration_ms,
            max_body_bytes,
        })
    }
}
