//! Change notification for the storefront stores.
//!
//! Every store owns one bus and publishes a change value after each mutation.
//! Subscribers (the presentation layer) receive a copy of every change and
//! re-read whatever accessors they render.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{ChangeBus, Subscription};
pub use in_memory_bus::{InMemoryChangeBus, NotifierError};
