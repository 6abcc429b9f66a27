//! Entity trait: identity that survives value changes.

/// Entity marker + minimal interface.
///
/// Two entities with the same id are the same entity, even when their other
/// fields differ. The cart relies on this to match lines by product id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
