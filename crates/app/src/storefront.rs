use std::sync::Arc;

use anyhow::Context;
use storefront_cart::{CartStore, CheckoutSummary};
use storefront_catalog::{CatalogStatus, CatalogStore, ProductSource};
use storefront_client::CatalogClient;
use storefront_core::ProductId;
use storefront_preferences::PreferencesStore;

use crate::config::StorefrontConfig;

/// Owns one instance of every store for the lifetime of the app session.
///
/// Handles are `Arc`s so screens can keep them; nothing here is global.
#[derive(Debug)]
pub struct Storefront<S = CatalogClient> {
    catalog: Arc<CatalogStore<S>>,
    cart: Arc<CartStore>,
    preferences: Arc<PreferencesStore>,
}

impl Storefront<CatalogClient> {
    /// Initialize logging and wire the stores to the HTTP catalog client.
    pub fn new(config: StorefrontConfig) -> anyhow::Result<Self> {
        match config.log_filter.as_deref() {
            Some(filter) => storefront_observability::init_with_default(filter),
            None => storefront_observability::init(),
        }

        let client = CatalogClient::new(config.client)
            .context("failed to build catalog HTTP client")?;
        tracing::info!(endpoint = client.endpoint(), "storefront created");

        Ok(Self::with_source(client))
    }
}

impl<S> Storefront<S>
where
    S: ProductSource,
{
    pub fn with_source(source: S) -> Self {
        Self {
            catalog: Arc::new(CatalogStore::new(source)),
            cart: Arc::new(CartStore::new()),
            preferences: Arc::new(PreferencesStore::new()),
        }
    }

    pub fn catalog(&self) -> Arc<CatalogStore<S>> {
        Arc::clone(&self.catalog)
    }

    pub fn cart(&self) -> Arc<CartStore> {
        Arc::clone(&self.cart)
    }

    pub fn preferences(&self) -> Arc<PreferencesStore> {
        Arc::clone(&self.preferences)
    }

    /// Launch load and pull-to-refresh.
    pub async fn refresh(&self) -> CatalogStatus {
        self.catalog.fetch_products().await
    }

    /// Add a catalog product by id. Returns `false` for ids the catalog does not hold.
    pub fn add_to_cart_by_id(&self, id: ProductId) -> bool {
        match self.catalog.product_by_id(id) {
            Some(product) => {
                self.cart.add_to_cart(product);
                true
            }
            None => {
                tracing::debug!(product_id = %id, "add to cart for unknown product");
                false
            }
        }
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        self.cart.checkout_summary()
    }

    /// Tear the session down: empty the cart and disconnect every subscriber.
    pub fn dispose(self) {
        self.cart.clear_cart();
        self.catalog.close_subscriptions();
        self.cart.close_subscriptions();
        self.preferences.close_subscriptions();
        tracing::info!("storefront disposed");
    }
}
