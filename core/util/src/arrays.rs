//! Array and slice helpers.

use std::collections::HashSet;
use std::hash::Hash;

use rand::seq::SliceRandom;

/// Build the inclusive arithmetic sequence from `start` towards `end`.
///
/// The sequence contains `end` itself when the step lands on it exactly:
/// `range(0, 3, 1)` is `[0, 1, 2, 3]`. A zero step, or a step pointing away
/// from `end`, yields an empty vector.
pub fn range(start: i64, end: i64, step: i64) -> Vec<i64> {
    if step == 0 || (step > 0 && end < start) || (step < 0 && end > start) {
        return Vec::new();
    }

    let len = (end - start) / step + 1;
    (0..len).map(|i| start + i * step).collect()
}

/// Shuffle the slice in place with a uniformly random permutation.
pub fn shuffle<T>(values: &mut [T]) {
    values.shuffle(&mut rand::thread_rng());
}

/// Collect the distinct values of a slice, preserving first-occurrence
/// order.
pub fn unique<T: Eq + Hash + Clone>(values: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    values.iter().filter(|v| seen.insert(*v)).cloned().collect()
}
