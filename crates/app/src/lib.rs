//! `storefront-app`: composition root for the storefront state layer.
//!
//! The presentation layer creates one [`Storefront`] at launch, hands the store
//! handles to its screens, and calls [`Storefront::dispose`] on exit.

pub mod config;
pub mod storefront;

pub use config::StorefrontConfig;
pub use storefront::Storefront;
