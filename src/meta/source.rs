use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::backend::{self, TOKEN_HEADER};
use crate::error::MetaLoadError;

/// One row of the backend's table listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableMeta {
    pub id: String,
    pub title: String,
}

impl TableMeta {
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableListing {
    #[serde(default)]
    list: Vec<TableMeta>,
}

/// Where the cache gets its full name → identifier listing from.
#[async_trait]
pub trait MetaSource: Send + Sync {
    async fn fetch_tables(&self) -> Result<Vec<TableMeta>, MetaLoadError>;
}

/// Reads `GET {base}/api/v2/meta/bases/{base_id}/tables` with the backend credential.
pub struct BackendMetaSource {
    client: reqwest::Client,
    url: Url,
    api_token: String,
}

impl BackendMetaSource {
    pub fn new(client: reqwest::Client, base_url: &Url, base_id: &str, api_token: impl Into<String>) -> Result<Self, MetaLoadError> {
        Ok(Self {
            client,
            url: backend::meta_tables_url(base_url, base_id)?,
            api_token: api_token.into(),
        })
    }
}

#[async_trait]
impl MetaSource for BackendMetaSource {
    async fn fetch_tables(&self) -> Result<Vec<TableMeta>, MetaLoadError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(TOKEN_HEADER, &self.api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetaLoadError::Status(status));
        }

        let listing: TableListing = response.json().await?;
        Ok(listing.list)
    }
}
