//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new value. `Money` is the canonical example here: two
/// amounts of `10.00` are the same amount no matter where they came from.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
