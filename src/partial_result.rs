use std::ops::Deref;

use crate::selector::sort_descending;
use crate::strategy::Strategy;

/// The Top-K of one chunk or of one merge, sorted descending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialResult {
    values: Vec<i32>,
}

impl PartialResult {
    /// Create a [PartialResult] from already selected values in any order
    pub fn new(mut values: Vec<i32>) -> PartialResult {
        sort_descending(&mut values);
        PartialResult {
            values,
        }
    }

    /// Select the `k` largest of `values` with `strategy`
    pub fn select(values: Vec<i32>, k: usize, strategy: Strategy) -> PartialResult {
        PartialResult::new(strategy.select(values, k))
    }

    /// Merge two partial results into the Top-K of their union.
    ///
    /// The operation is order independent: `a.merge(b)` and `b.merge(a)` hold the same
    /// elements.
    pub fn merge(self, other: PartialResult, k: usize, strategy: Strategy) -> PartialResult {
        let mut values = self.values;
        values.extend_from_slice(&other.values);
        drop(other);
        PartialResult::select(values, k, strategy)
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.values
    }
}

impl Deref for PartialResult {
    type Target = [i32];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}
