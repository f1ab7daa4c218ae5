use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which document store backs the `interviews` and `feedback` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("Unknown STORE_BACKEND '{other}' (expected 'postgres' or 'memory')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Only required for the Postgres backend.
    pub database_url: Option<String>,
    pub google_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StoreBackend>()?;

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            store_backend,
            database_url,
            google_api_key: require_env("GOOGLE_GENERATIVE_AI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
