use async_trait::async_trait;
use reqwest::StatusCode;
use storefront_catalog::{FetchError, Product, ProductSource};

use crate::config::ClientConfig;

/// Fetches the product list over HTTP.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl CatalogClient {
    /// Build a client; fails only if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// GET the catalog and parse every element, all-or-nothing.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        let resp = self
            .http
            .get(&self.config.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::warn!(endpoint = %self.config.endpoint, status = status.as_u16(), "catalog rejected request");
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let products: Vec<Product> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(endpoint = %self.config.endpoint, count = products.len(), "catalog parsed");
        Ok(products)
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        CatalogClient::fetch_products(self).await
    }
}
