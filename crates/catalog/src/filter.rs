//! Pure filtering over the catalog.
//!
//! Nothing here holds state: the store passes its current products and filter
//! values in and gets a fresh view back, so identical inputs always yield
//! identical output.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::product::Product;

/// Category sentinel that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

pub fn matches_category(product: &Product, category: &str) -> bool {
    category == ALL_CATEGORIES || product.category == category
}

pub fn matches_search(product: &Product, needle_lower: &str) -> bool {
    needle_lower.is_empty() || product.matches_text(needle_lower)
}

/// Products matching both the category and the search text, in catalog order.
///
/// `search` is compared case-insensitively against title and description.
pub fn filter_products(all: &[Arc<Product>], category: &str, search: &str) -> Vec<Arc<Product>> {
    let needle = search.to_lowercase();

    all.iter()
        .filter(|p| matches_category(p, category) && matches_search(p, &needle))
        .cloned()
        .collect()
}

/// Distinct categories, sorted, with [`ALL_CATEGORIES`] first.
///
/// A product whose category is literally `"All"` does not add a second entry.
pub fn categories(all: &[Arc<Product>]) -> Vec<String> {
    let distinct: BTreeSet<&str> = all
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| *c != ALL_CATEGORIES)
        .collect();

    core::iter::once(ALL_CATEGORIES.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}
