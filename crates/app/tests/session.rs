use std::sync::Mutex;

use async_trait::async_trait;
use storefront_app::{Storefront, StorefrontConfig};
use storefront_catalog::{CatalogStatus, FetchError, Product, ProductSource, Rating};
use storefront_core::{Money, ProductId};
use storefront_preferences::{ThemeMode, ViewMode};

struct FixedSource {
    replies: Mutex<Vec<Result<Vec<Product>, FetchError>>>,
}

impl FixedSource {
    fn new(mut replies: Vec<Result<Vec<Product>, FetchError>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
        }
    }
}

#[async_trait]
impl ProductSource for FixedSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        let reply = { self.replies.lock().unwrap().pop() };
        reply.unwrap_or_else(|| Err(FetchError::Network("no more replies".into())))
    }
}

fn product(id: u64, cents: u64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Money::from_cents(cents),
        description: format!("Description of {id}"),
        category: category.to_string(),
        image_url: format!("https://img.example/{id}.png"),
        rating: Rating::new(4.0, 10).unwrap(),
    }
}

fn two_products() -> Vec<Product> {
    vec![product(1, 1000, "clothing"), product(2, 2550, "jewelery")]
}

#[tokio::test]
async fn fetch_then_fill_cart_scenario() {
    let app = Storefront::with_source(FixedSource::new(vec![Ok(two_products())]));

    assert_eq!(app.refresh().await, CatalogStatus::Loaded);
    assert!(app.add_to_cart_by_id(ProductId::new(1)));
    assert!(app.add_to_cart_by_id(ProductId::new(1)));
    assert!(app.add_to_cart_by_id(ProductId::new(2)));

    let cart = app.cart();
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), 45.50);

    let summary = app.checkout_summary();
    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.lines[0].line_total, Money::from_cents(2000));
    assert_eq!(summary.total_price.to_string(), "45.50");
}

#[tokio::test]
async fn unknown_ids_are_not_added() {
    let app = Storefront::with_source(FixedSource::new(vec![Ok(two_products())]));
    app.refresh().await;

    assert!(!app.add_to_cart_by_id(ProductId::new(42)));
    assert!(app.cart().is_empty());
}

#[tokio::test]
async fn cart_survives_failed_refresh() {
    let app = Storefront::with_source(FixedSource::new(vec![
        Ok(two_products()),
        Err(FetchError::Parse("expected value".into())),
    ]));
    app.refresh().await;
    app.add_to_cart_by_id(ProductId::new(2));

    assert_eq!(app.refresh().await, CatalogStatus::Failed);

    let catalog = app.catalog();
    assert_eq!(catalog.all_products().len(), 2);
    assert!(catalog.last_error().unwrap().contains("could not be read"));
    assert_eq!(app.cart().total_items(), 1);
}

#[tokio::test]
async fn electronics_filter_without_matches_is_empty_not_error() {
    let app = Storefront::with_source(FixedSource::new(vec![Ok(two_products())]));
    app.refresh().await;

    let catalog = app.catalog();
    catalog.set_category("Electronics");

    assert!(catalog.products().is_empty());
    assert!(catalog.last_error().is_none());
}

#[tokio::test]
async fn handles_share_state() {
    let app = Storefront::with_source(FixedSource::new(vec![Ok(two_products())]));
    app.refresh().await;

    let screen_a = app.preferences();
    let screen_b = app.preferences();
    screen_a.set_view_mode(ViewMode::List);
    screen_a.set_theme_mode(ThemeMode::Dark);

    assert_eq!(screen_b.view_mode(), ViewMode::List);
    assert_eq!(screen_b.theme_mode(), ThemeMode::Dark);
}

#[tokio::test]
async fn dispose_clears_cart_and_disconnects_subscribers() {
    let app = Storefront::with_source(FixedSource::new(vec![Ok(two_products())]));
    app.refresh().await;
    app.add_to_cart_by_id(ProductId::new(1));

    let cart = app.cart();
    let cart_sub = cart.subscribe();
    let catalog_sub = app.catalog().subscribe();
    let prefs_sub = app.preferences().subscribe();

    app.dispose();

    assert!(cart.is_empty());
    assert_eq!(cart_sub.drain().len(), 1);
    assert!(cart_sub.is_disconnected());
    assert!(catalog_sub.is_disconnected());
    assert!(prefs_sub.is_disconnected());
}

#[test]
fn default_config_builds_http_backed_storefront() {
    let app = Storefront::new(StorefrontConfig::default()).unwrap();

    assert_eq!(app.catalog().status(), CatalogStatus::Idle);
    assert!(app.cart().is_empty());
    assert_eq!(app.preferences().view_mode(), ViewMode::Grid);
}
