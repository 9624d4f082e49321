//! Brute-force reference for checking `RangeTree` results.
//!
//! Every operation walks the affected elements one by one. The clamping rules
//! match `RangeTree::new_min` exactly so the two can be driven in lockstep.

use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BruteForce<V> {
    data: Vec<V>,
}

impl<V: Value> BruteForce<V> {
    pub fn new<I: IntoIterator<Item = V>>(values: I) -> BruteForce<V> {
        return BruteForce { data: values.into_iter().collect() };
    }

    pub fn len(&self) -> usize {
        return self.data.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.data.is_empty();
    }

    pub fn as_slice(&self) -> &[V] {
        return &self.data;
    }

    /// Add `delta` to each element of `[left, right]`, clamped to the data.
    pub fn update(&mut self, left: usize, right: usize, delta: V) {
        let end = self.data.len().min(right.saturating_add(1));
        if left >= end {
            return;
        }
        for item in &mut self.data[left..end] {
            *item = *item + delta;
        }
    }

    /// Minimum of `[left, right]`, or `V::MAX` when `right` is past the end
    /// or the range is inverted.
    pub fn query(&self, left: usize, right: usize) -> V {
        if right >= self.data.len() || left > right {
            return V::MAX;
        }
        return self.data[left..=right].iter().copied().min().unwrap_or(V::MAX);
    }
}
