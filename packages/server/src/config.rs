use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Bearer-token lifetime in minutes; `expires_in` in token payloads is
    /// this value times 60.
    pub token_ttl_minutes: i64,
    pub weapp_app_id: String,
    pub weapp_app_secret: String,
    /// Whether a successful mini-program binding also returns a bearer
    /// token. Off by default.
    pub weapp_bind_issues_token: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "minimall".to_string()),
            token_ttl_minutes: env::var("STORE_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("STORE_TOKEN_TTL_MINUTES must be a valid number")?,
            weapp_app_id: env::var("WEAPP_APP_ID").context("WEAPP_APP_ID must be set")?,
            weapp_app_secret: env::var("WEAPP_APP_SECRET")
                .context("WEAPP_APP_SECRET must be set")?,
            weapp_bind_issues_token: env::var("WEAPP_BIND_ISSUES_TOKEN")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
