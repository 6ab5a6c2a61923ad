use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,

    // Auth
    pub secret_key: String,
    pub jwt_expires_in: String,
    pub admin_login_path: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,

    pub cors_allow_origin: String,

    // Object storage
    pub upload_dir: String,
    pub public_upload_base_url: String,
    pub upload_max_bytes: usize,

    // Content resolution
    pub content_cache_ttl_secs: u64,
    pub content_fetch_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://data/studio.db?mode=rwc".to_string(),

            secret_key: "change-me".to_string(),
            jwt_expires_in: "7d".to_string(),
            admin_login_path: "/admin/login".to_string(),
            admin_email: None,
            admin_password: None,
            admin_name: "Studio Admin".to_string(),

            cors_allow_origin: "*".to_string(),

            upload_dir: "data/uploads".to_string(),
            public_upload_base_url: "/uploads".to_string(),
            upload_max_bytes: 10 * 1024 * 1024,

            content_cache_ttl_secs: 300,
            content_fetch_timeout_ms: 1500,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var("PORT")? {
            config.port = port;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database_url = database_url;
        }

        if let Ok(secret_key) = env::var("STUDIO_SECRET_KEY") {
            config.secret_key = secret_key;
        } else {
            tracing::warn!("STUDIO_SECRET_KEY is not set, using the built-in development key");
        }
        if let Ok(expires_in) = env::var("JWT_EXPIRES_IN") {
            config.jwt_expires_in = expires_in;
        }
        if let Ok(path) = env::var("ADMIN_LOGIN_PATH") {
            config.admin_login_path = path;
        }
        config.admin_email = env::var("ADMIN_EMAIL").ok().filter(|s| !s.trim().is_empty());
        config.admin_password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());
        if let Ok(name) = env::var("ADMIN_NAME") {
            config.admin_name = name;
        }

        if let Ok(origin) = env::var("CORS_ALLOW_ORIGIN") {
            config.cors_allow_origin = origin;
        }

        if let Ok(dir) = env::var("UPLOAD_DIR") {
            config.upload_dir = dir;
        }
        if let Ok(base) = env::var("PUBLIC_UPLOAD_BASE_URL") {
            config.public_upload_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(max) = parse_var("UPLOAD_MAX_BYTES")? {
            config.upload_max_bytes = max;
        }

        if let Some(ttl) = parse_var("CONTENT_CACHE_TTL_SECS")? {
            config.content_cache_ttl_secs = ttl;
        }
        if let Some(timeout) = parse_var("CONTENT_FETCH_TIMEOUT_MS")? {
            config.content_fetch_timeout_ms = timeout;
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        Err(_) => Ok(None),
    }
}
