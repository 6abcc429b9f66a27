//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `Money` and a
/// product `Rating` are value objects; a `Product` is an entity.
///
/// ```ignore
/// let a = Money::from_cents(1050);
/// let b = Money::from_cents(1050);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
