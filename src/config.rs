use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Address the original web clients send as the uploader, also used for seeding.
pub const DEFAULT_ADMIN_EMAIL: &str = "cornhub1420@gmail.com";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// How admin-only routes establish who the caller is.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Trust an `email` supplied by the client and check its role.
    Legacy,
    /// Require a signed bearer token whose subject is an admin.
    Token,
}

impl std::str::FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(AuthMode::Legacy),
            "token" => Ok(AuthMode::Token),
            other => anyhow::bail!("unknown AUTH_MODE {other:?}, expected legacy|token"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub auth_mode: AuthMode,
    pub seed_admin_email: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let auth_mode = match std::env::var("AUTH_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => AuthMode::Legacy,
        };

        // A secret is only mandatory once tokens are actually issued.
        let secret = match (auth_mode, std::env::var("JWT_SECRET")) {
            (_, Ok(s)) => s,
            (AuthMode::Token, Err(_)) => anyhow::bail!("JWT_SECRET is required when AUTH_MODE=token"),
            (AuthMode::Legacy, Err(_)) => String::new(),
        };

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cinephile".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cinephile-admins".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        Ok(Self {
            database_url,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            auth_mode,
            seed_admin_email: std::env::var("SEED_ADMIN_EMAIL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.into()),
            jwt,
        })
    }
}
