use crate::constants::*;
use std::env;
use thiserror::Error;
use time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: String,
    pub token_secret: String,
    /// Lifetime of issued tokens. `None` issues tokens without an `exp` claim.
    pub token_ttl: Option<Duration>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET_TOKEN environment variable is required")]
    MissingTokenSecret,
    #[error("Invalid token secret: must be at least {0} bytes long")]
    InvalidTokenSecret(usize),
    #[error("Invalid port number: {0}")]
    InvalidPort(String),
    #[error("Invalid token lifetime: {0}")]
    InvalidTokenTtl(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        let data_path = lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port))?;

        let token_secret = lookup("SECRET_TOKEN").ok_or(ConfigError::MissingTokenSecret)?;
        if token_secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(ConfigError::InvalidTokenSecret(MIN_TOKEN_SECRET_LENGTH));
        }

        let token_ttl = match lookup("TOKEN_TTL_SECONDS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(seconds) if seconds > 0 => Some(Duration::seconds(seconds)),
                _ => return Err(ConfigError::InvalidTokenTtl(raw)),
            },
            None => None,
        };

        Ok(Config {
            host,
            port,
            data_path,
            token_secret,
            token_ttl,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
