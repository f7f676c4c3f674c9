use anyhow::{bail, Context, Result};

const DEFAULT_EXPORT_MAX_BYTES: usize = 20 * 1024 * 1024;

/// Which record store backs the persistence gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("RESUME_STORE must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    /// Required when `store` is `Postgres`.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    /// Request body limit for `POST /api/v1/export`.
    pub export_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store = StoreBackend::parse(&optional_env("RESUME_STORE", "postgres"))?;
        let database_url = match store {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            store,
            database_url,
            db_max_connections: optional_env("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            export_max_bytes: match std::env::var("EXPORT_MAX_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("EXPORT_MAX_BYTES must be a byte count")?,
                Err(_) => DEFAULT_EXPORT_MAX_BYTES,
            },
        })
    }

    /// In-memory configuration used by router tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            store: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            port: 0,
            rust_log: "debug".to_string(),
            export_max_bytes: DEFAULT_EXPORT_MAX_BYTES,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
