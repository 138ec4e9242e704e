//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Every type in this crate is a value: a feature spec, a set of user inputs or
/// a reconciled record has no identity beyond its contents. Two values built
/// from the same data compare equal, and none of them change after
/// construction. To "modify" one, build a new one.
///
/// ```ignore
/// let a = FeatureSpec::new(["hour", "month"])?;
/// let b = FeatureSpec::new(["hour", "month"])?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
