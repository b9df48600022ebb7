//! Predicate-combinator validation.
//!
//! Checks are plain `Fn(&T) -> bool` closures; [`validate`] runs a set of
//! them against one value and [`not`] inverts a single check.

/// Pending validation of a borrowed value.
pub struct Validation<'a, T: ?Sized> {
    value: &'a T,
}

/// Begin validating `value`.
pub fn validate<T: ?Sized>(value: &T) -> Validation<'_, T> {
    Validation { value }
}

impl<T: ?Sized> Validation<'_, T> {
    /// True when every check accepts the value. An empty check list passes.
    pub fn all(self, checks: &[&dyn Fn(&T) -> bool]) -> bool {
        checks.iter().all(|check| check(self.value))
    }
}

/// Invert a check.
pub fn not<T: ?Sized>(check: impl Fn(&T) -> bool) -> impl Fn(&T) -> bool {
    move |value| !check(value)
}
