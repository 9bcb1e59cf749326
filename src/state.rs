use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::meta::{BackendMetaSource, MetaCache, MetaSource};
use crate::proxy::Forwarder;
use crate::users::{StaticUserDirectory, UserDirectory};

/// Process-wide, read-only collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserDirectory>,
    pub meta: Arc<MetaCache>,
    pub forwarder: Arc<Forwarder>,
}

impl AppState {
    /// Wires the backend-backed metadata source and the demo user set.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let client = http_client(&config)?;
        let source = BackendMetaSource::new(
            client.clone(),
            &config.backend.base_url,
            &config.backend.base_id,
            config.backend.api_token.clone(),
        )
        .map_err(|e| ConfigError::Invalid {
            key: "BACKEND_URL",
            reason: e.to_string(),
        })?;

        Self::build(config, client, Arc::new(StaticUserDirectory::demo()), Arc::new(source))
    }

    /// Same as `from_config` but with caller-supplied users and metadata source.
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserDirectory>,
        meta_source: Arc<dyn MetaSource>,
    ) -> Result<Self, ConfigError> {
        let client = http_client(&config)?;
        Self::build(config, client, users, meta_source)
    }

    fn build(
        config: AppConfig,
        client: reqwest::Client,
        users: Arc<dyn UserDirectory>,
        meta_source: Arc<dyn MetaSource>,
    ) -> Result<Self, ConfigError> {
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.token_ttl_hours)?;
        let forwarder = Forwarder::new(client, config.backend.api_token.clone());

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            users,
            meta: Arc::new(MetaCache::new(meta_source)),
            forwarder: Arc::new(forwarder),
        })
    }
}

fn http_client(config: &AppConfig) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(config.backend_timeout())
        .build()
        .map_err(ConfigError::HttpClient)
}
