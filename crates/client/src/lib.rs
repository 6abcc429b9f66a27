//! HTTP client for the remote product catalog.
//!
//! One GET, no retries, no auth. The caller (the catalog store) decides what to
//! do with failures.

pub mod client;
pub mod config;

pub use client::CatalogClient;
pub use config::{ClientConfig, DEFAULT_CATALOG_ENDPOINT};
pub use storefront_catalog::FetchError;
