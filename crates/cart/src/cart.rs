use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use storefront_catalog::Product;
use storefront_core::{Entity, Money, ProductId, SubscriptionId};
use storefront_events::{ChangeBus, InMemoryChangeBus, Subscription};

use crate::summary::{CheckoutSummary, SummaryLine};

/// Cart line: a shared product handle and a quantity of at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Arc<Product>,
    quantity: u32,
}

impl CartLine {
    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> Money {
        self.product.unit_price().times(self.quantity)
    }
}

/// What a cart operation did.
///
/// Every operation publishes exactly one change, including calls that left the
/// cart as it was (`Unchanged`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Added { product_id: ProductId, quantity: u32 },
    QuantityUpdated { product_id: ProductId, quantity: u32 },
    Removed { product_id: ProductId },
    Unchanged { product_id: ProductId },
    Cleared,
}

/// Session cart keyed by product id, in first-added order.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: RwLock<Vec<CartLine>>,
    bus: InMemoryChangeBus<CartChange>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit. A product already in the cart (same id) gets its quantity
    /// bumped; the stored product is kept as first added.
    pub fn add_to_cart(&self, product: Arc<Product>) {
        let product_id = product.id();
        let change = {
            let mut lines = self.write_lines();
            match lines.iter_mut().find(|l| l.product_id() == product_id) {
                Some(line) => {
                    line.quantity = line.quantity.saturating_add(1);
                    CartChange::Added {
                        product_id,
                        quantity: line.quantity,
                    }
                }
                None => {
                    lines.push(CartLine {
                        product,
                        quantity: 1,
                    });
                    CartChange::Added {
                        product_id,
                        quantity: 1,
                    }
                }
            }
        };
        tracing::debug!(product_id = %product_id, ?change, "add to cart");
        self.notify(change);
    }

    /// Drop the line for this product; absent products are ignored.
    pub fn remove_from_cart(&self, product: &Product) {
        let change = self.remove_line(product.id());
        self.notify(change);
    }

    /// Set the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line. A product that is not in the cart is
    /// left out; this never creates a line.
    pub fn update_quantity(&self, product: &Product, quantity: i64) {
        let product_id = product.id();
        if quantity <= 0 {
            let change = self.remove_line(product_id);
            self.notify(change);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let change = {
            let mut lines = self.write_lines();
            match lines.iter_mut().find(|l| l.product_id() == product_id) {
                Some(line) => {
                    line.quantity = quantity;
                    CartChange::QuantityUpdated {
                        product_id,
                        quantity,
                    }
                }
                None => CartChange::Unchanged { product_id },
            }
        };
        tracing::debug!(product_id = %product_id, ?change, "update quantity");
        self.notify(change);
    }

    pub fn clear_cart(&self) {
        let dropped = {
            let mut lines = self.write_lines();
            let dropped = lines.len();
            lines.clear();
            dropped
        };
        tracing::debug!(dropped, "cart cleared");
        self.notify(CartChange::Cleared);
    }

    /// Sum of `price * quantity`, recomputed on every call.
    pub fn total_price(&self) -> f64 {
        self.total_money().to_decimal()
    }

    pub fn total_money(&self) -> Money {
        self.read_lines().iter().map(CartLine::line_total).sum()
    }

    pub fn total_items(&self) -> u64 {
        self.read_lines()
            .iter()
            .map(|l| u64::from(l.quantity))
            .sum()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.read_lines().clone()
    }

    pub fn line_count(&self) -> usize {
        self.read_lines().len()
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.read_lines()
            .iter()
            .find(|l| l.product_id() == product_id)
            .map_or(0, CartLine::quantity)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.quantity_of(product_id) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.read_lines().is_empty()
    }

    /// Everything the checkout screen shows, taken from one consistent read.
    pub fn checkout_summary(&self) -> CheckoutSummary {
        let lines = self.read_lines();
        let summary_lines: Vec<SummaryLine> = lines
            .iter()
            .map(|l| SummaryLine {
                product_id: l.product_id(),
                title: l.product.title.clone(),
                unit_price: l.product.unit_price(),
                quantity: l.quantity,
                line_total: l.line_total(),
            })
            .collect();

        CheckoutSummary::from_lines(summary_lines)
    }

    pub fn subscribe(&self) -> Subscription<CartChange> {
        self.bus.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Detach every subscriber (app teardown).
    pub fn close_subscriptions(&self) {
        self.bus.close();
    }

    fn remove_line(&self, product_id: ProductId) -> CartChange {
        let mut lines = self.write_lines();
        let before = lines.len();
        lines.retain(|l| l.product_id() != product_id);

        if lines.len() == before {
            CartChange::Unchanged { product_id }
        } else {
            tracing::debug!(product_id = %product_id, "removed from cart");
            CartChange::Removed { product_id }
        }
    }

    fn notify(&self, change: CartChange) {
        if let Err(err) = self.bus.publish(change) {
            tracing::warn!(?err, "failed to notify cart subscribers");
        }
    }

    fn read_lines(&self) -> RwLockReadGuard<'_, Vec<CartLine>> {
        self.lines.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lines(&self) -> RwLockWriteGuard<'_, Vec<CartLine>> {
        self.lines.write().unwrap_or_else(PoisonError::into_inner)
    }
}
