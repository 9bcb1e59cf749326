use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub security: SecurityConfig,
    pub server: ServerConfig,
    pub meta: MetaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Url,
    pub base_id: String,
    /// Privileged backend credential. Sent upstream only, never to callers.
    #[serde(skip_serializing)]
    pub api_token: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub refresh_interval_secs: u64,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
    pub const DEFAULT_REFRESH_SECS: u64 = 600;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let base_url = required("BACKEND_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
            key: "BACKEND_URL",
            reason: e.to_string(),
        })?;

        let mut config = Self {
            backend: BackendConfig {
                base_url,
                base_id: required("BACKEND_BASE_ID")?,
                api_token: required("BACKEND_API_TOKEN")?,
                timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            },
            security: SecurityConfig {
                jwt_secret: required("JWT_SECRET")?,
                token_ttl_hours: Self::DEFAULT_TOKEN_TTL_HOURS,
            },
            server: ServerConfig {
                port: Self::DEFAULT_PORT,
            },
            meta: MetaConfig {
                refresh_interval_secs: Self::DEFAULT_REFRESH_SECS,
            },
        };

        // Optional overrides keep their defaults when unparseable
        if let Some(v) = lookup("PORT") {
            config.server.port = v.parse().unwrap_or(config.server.port);
        }
        if let Some(v) = lookup("META_REFRESH_SECS") {
            config.meta.refresh_interval_secs = v
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .unwrap_or(config.meta.refresh_interval_secs);
        }
        if let Some(v) = lookup("BACKEND_TIMEOUT_SECS") {
            config.backend.timeout_secs = v.parse().unwrap_or(config.backend.timeout_secs);
        }

        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.meta.refresh_interval_secs)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }
}
