//! Port through which the catalog store obtains products.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::product::Product;

/// Why a catalog fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The catalog answered with a non-200 status.
    #[error("catalog returned HTTP status {0}")]
    BadStatus(u16),

    /// The request never produced a response (DNS, timeout, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The body was not a JSON array of valid products.
    #[error("malformed catalog response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Message the store exposes as `last_error`.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(cause) => format!(
                "Could not reach the store ({cause}). Check your connection and pull to refresh."
            ),
            FetchError::BadStatus(code) => format!(
                "The store is having trouble right now (HTTP {code}). Please try again later."
            ),
            FetchError::Parse(detail) => {
                format!("The store sent product data that could not be read ({detail}).")
            }
        }
    }
}

/// Anything that can produce the full product list in one call.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError>;
}

#[async_trait]
impl<S> ProductSource for Arc<S>
where
    S: ProductSource + ?Sized,
{
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        (**self).fetch_products().await
    }
}
