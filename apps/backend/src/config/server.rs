use std::env;

use crate::error::AppError;

/// Process-level settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base seed for every session RNG; `None` seeds each session from OS entropy.
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("SERAPH_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("SERAPH_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("SERAPH_PORT must be a valid port number, got '{raw}'")))?,
            None => 3000,
        };
        let seed = lookup("SERAPH_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| AppError::config(format!("SERAPH_SEED must be a u64, got '{raw}'")))
            })
            .transpose()?;

        Ok(Self { host, port, seed })
    }
}
