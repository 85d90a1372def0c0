/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, JWT_SECRET, HTTP limits など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - JWT_SECRET はここで一度だけ読み、TokenService に注入する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    // HMAC secret shared by token issuance and the account gate
    pub jwt_secret: String,
    pub jwt_expires_at: i64,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

// Manual Debug so the secret never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_expires_at", &self.jwt_expires_at)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let jwt_expires_at = match lookup("JWT_EXPIRES_AT") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::Invalid("JWT_EXPIRES_AT"))?,
            None => 15_000,
        };

        let request_timeout = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let request_body_limit_bytes = lookup("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024); // 1 MiB

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expires_at,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}
