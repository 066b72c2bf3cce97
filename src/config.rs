//! Runtime settings read from the process environment (after `.env` is loaded).

const DEFAULT_DATABASE_URL: &str = "users.db";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_POOL_SIZE must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPoolSize(raw)),
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            pool_size,
        })
    }
}
