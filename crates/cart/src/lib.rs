//! Session shopping cart.
//!
//! Pure in-memory state: no IO, no async, no error channel. Quantities that
//! drop to zero or below remove the line instead of being rejected.

pub mod cart;
pub mod summary;

pub use cart::{CartChange, CartLine, CartStore};
pub use summary::{CheckoutSummary, SummaryLine};
