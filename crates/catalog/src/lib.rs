//! Product catalog: the product model, the pure filter over it, and the
//! observable store that owns the session's catalog snapshot.
//!
//! The store talks to the network only through [`ProductSource`], so it can be
//! driven by the HTTP client in production and by in-memory fakes in tests.

pub mod filter;
pub mod product;
pub mod source;
pub mod store;

pub use filter::{ALL_CATEGORIES, categories, filter_products};
pub use product::{Product, Rating};
pub use source::{FetchError, ProductSource};
pub use store::{CatalogChange, CatalogSnapshot, CatalogStatus, CatalogStore};
