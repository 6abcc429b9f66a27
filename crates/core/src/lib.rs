//! `storefront-core`: shared primitives for the storefront state layer.
//!
//! This crate contains **pure** building blocks (no IO, no async): identifiers,
//! money arithmetic and the domain error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, SubscriptionId};
pub use money::Money;
pub use value_object::ValueObject;
