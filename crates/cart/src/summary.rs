//! Checkout summary: a frozen, serializable view of the cart.

use serde::Serialize;
use storefront_core::{Money, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub lines: Vec<SummaryLine>,
    pub total_items: u64,
    pub total_price: Money,
}

impl CheckoutSummary {
    pub fn from_lines(lines: Vec<SummaryLine>) -> Self {
        let total_items = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let total_price = lines.iter().map(|l| l.line_total).sum();
        Self {
            lines,
            total_items,
            total_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
