//! Range tree with lazy propagation of additive updates.
//!
//! The tree supports, in O(log n) each:
//! - Adding a delta to every element of an index range
//! - Aggregating (min, max, ...) the elements of an index range
//!
//! # Layout
//!
//! The tree is stored 1-indexed in two flat vectors of length `2 * capacity`,
//! where `capacity` is the smallest power of two holding every element. Node
//! `i` has children `2 * i` and `2 * i + 1`, leaves live at
//! `capacity..2 * capacity`, and the index range a node covers is implied by
//! the descent rather than stored. Leaves past the last element hold the
//! neutral value so they never win an aggregate.
//!
//! # Invariants
//!
//! 1. For every internal node `i`, `aggregate[i]` is the combination of
//!    `aggregate[c] + pending[c]` over both children `c`.
//! 2. `aggregate[i]` does not include `pending[i]`. A reader consuming a node
//!    directly adds it; a descent past the node pushes it first.
//! 3. A non-zero `pending[i]` only ever sits on a node whose range lies inside
//!    `[0, len)`. Padding leaves keep the neutral value and zero pending.
//!
//! The logical value of element `k` is the leaf aggregate plus the sum of
//! `pending` along the path from the root to that leaf. Pending deltas add
//! with wrapping arithmetic, so a running sum may leave the value range as
//! long as the logical value it contributes to fits.

use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::profiling;
use crate::value::Value;

/// A range-update / range-aggregate tree over a fixed number of elements.
///
/// `combine` must be associative and commutative, `neutral` must be its
/// identity, and adding a delta to both arguments must shift the result by
/// the same delta. `min` and `max` satisfy all three.
#[derive(Clone)]
pub struct RangeTree<V, F = fn(V, V) -> V> {
    len: usize,
    capacity: usize,
    aggregate: Vec<V>,
    pending: Vec<V>,
    neutral: V,
    combine: F,
}

impl<V: Value> RangeTree<V> {
    /// A tree answering range minimum queries.
    pub fn new_min<I: IntoIterator<Item = V>>(values: I) -> RangeTree<V> {
        return RangeTree::new(values, <V as Ord>::min as fn(V, V) -> V, V::MAX);
    }

    /// A tree answering range maximum queries.
    pub fn new_max<I: IntoIterator<Item = V>>(values: I) -> RangeTree<V> {
        return RangeTree::new(values, <V as Ord>::max as fn(V, V) -> V, V::MIN);
    }
}

impl<V: Value, F: Fn(V, V) -> V> RangeTree<V, F> {
    /// Build a tree over `values`, bottom-up.
    pub fn new<I: IntoIterator<Item = V>>(values: I, combine: F, neutral: V) -> Self {
        let values: Vec<V> = values.into_iter().collect();
        let len = values.len();
        let capacity = len.next_power_of_two();

        let mut aggregate = vec![neutral; 2 * capacity];
        aggregate[capacity..capacity + len].copy_from_slice(&values);
        for i in (1..capacity).rev() {
            aggregate[i] = combine(aggregate[2 * i], aggregate[2 * i + 1]);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(len, capacity, "built range tree");

        return RangeTree {
            len,
            capacity,
            aggregate,
            pending: vec![V::ZERO; 2 * capacity],
            neutral,
            combine,
        };
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        return self.len;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Number of leaf slots, a power of two `>= len`.
    #[inline]
    pub fn capacity(&self) -> usize {
        return self.capacity;
    }

    /// The identity element returned for empty ranges.
    #[inline]
    pub fn neutral(&self) -> V {
        return self.neutral;
    }

    /// Add `delta` to every element in the inclusive range `[left, right]`.
    ///
    /// `right` is clamped to the last element. A range that is empty after
    /// clamping leaves the tree untouched.
    pub fn update(&mut self, left: usize, right: usize, delta: V) {
        profiling::update();
        if self.len == 0 {
            return;
        }
        let right = right.min(self.len - 1);
        if left > right {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(left, right, delta = ?delta, "range update");

        self.update_node(1, 0, self.capacity - 1, left, right, delta);
    }

    /// Aggregate of the elements in the inclusive range `[left, right]`.
    ///
    /// Returns the neutral value when `left > right` or when `right` lies past
    /// the last element. Takes `&mut self` because the descent reconciles
    /// pending deltas on the way; logical values never change.
    pub fn query(&mut self, left: usize, right: usize) -> V {
        profiling::query();
        if right >= self.len || left > right {
            return self.neutral;
        }

        let result = self.query_node(1, 0, self.capacity - 1, left, right);

        #[cfg(feature = "tracing")]
        tracing::trace!(left, right, result = ?result, "range query");

        return result;
    }

    /// `update` over a Rust range, e.g. `tree.update_range(2..5, 1)`.
    pub fn update_range<R: RangeBounds<usize>>(&mut self, range: R, delta: V) {
        if let Some((left, right)) = self.inclusive(range) {
            self.update(left, right, delta);
        }
    }

    /// `query` over a Rust range. An empty range yields the neutral value, as
    /// does a range reaching past the last element.
    pub fn query_range<R: RangeBounds<usize>>(&mut self, range: R) -> V {
        return match self.inclusive(range) {
            Some((left, right)) => self.query(left, right),
            None => self.neutral,
        };
    }

    /// Logical value of a single element, without reconciling anything.
    pub fn get(&self, index: usize) -> Option<V> {
        if index >= self.len {
            return None;
        }
        let mut node = self.capacity + index;
        let mut value = self.aggregate[node];
        while node > 0 {
            value = value.wrapping_add(self.pending[node]);
            node >>= 1;
        }
        return Some(value);
    }

    /// Logical values of all elements.
    pub fn to_vec(&self) -> Vec<V> {
        return (0..self.len).filter_map(|i| self.get(i)).collect();
    }

    /// Move the pending delta of `index` into both children.
    ///
    /// No-op for leaves and for nodes with nothing pending. The logical value
    /// of every element is unchanged; only the node at which the delta is
    /// recorded moves. The caller must refresh `aggregate[index]` afterwards.
    pub(crate) fn push(&mut self, index: usize) {
        let delta = self.pending[index];
        if delta == V::ZERO || index >= self.capacity {
            return;
        }
        profiling::push();

        #[cfg(feature = "tracing")]
        tracing::trace!(index, delta = ?delta, "push pending delta");

        let (left, right) = (2 * index, 2 * index + 1);
        self.pending[left] = self.pending[left].wrapping_add(delta);
        self.pending[right] = self.pending[right].wrapping_add(delta);
        self.pending[index] = V::ZERO;
    }

    /// Aggregate of a node as seen from its parent.
    #[inline]
    fn shifted(&self, index: usize) -> V {
        return self.aggregate[index].wrapping_add(self.pending[index]);
    }

    /// Recompute an internal node from its children.
    #[inline]
    fn pull(&mut self, index: usize) {
        self.aggregate[index] = (self.combine)(self.shifted(2 * index), self.shifted(2 * index + 1));
    }

    /// `[left, right]` always overlaps `[lo, hi]`, the range `index` covers.
    fn update_node(&mut self, index: usize, lo: usize, hi: usize, left: usize, right: usize, delta: V) {
        profiling::visit();
        if left <= lo && hi <= right {
            self.pending[index] = self.pending[index].wrapping_add(delta);
            return;
        }

        let mid = lo + (hi - lo) / 2;
        if left <= mid {
            self.update_node(2 * index, lo, mid, left, right, delta);
        }
        if right > mid {
            self.update_node(2 * index + 1, mid + 1, hi, left, right, delta);
        }
        self.pull(index);
    }

    /// `[left, right]` always overlaps `[lo, hi]`, the range `index` covers.
    fn query_node(&mut self, index: usize, lo: usize, hi: usize, left: usize, right: usize) -> V {
        profiling::visit();
        if left <= lo && hi <= right {
            return self.shifted(index);
        }

        self.push(index);
        self.pull(index);

        let mid = lo + (hi - lo) / 2;
        if right <= mid {
            return self.query_node(2 * index, lo, mid, left, right);
        }
        if left > mid {
            return self.query_node(2 * index + 1, mid + 1, hi, left, right);
        }
        let a = self.query_node(2 * index, lo, mid, left, right);
        let b = self.query_node(2 * index + 1, mid + 1, hi, left, right);
        return (self.combine)(a, b);
    }

    /// Translate a Rust range into inclusive bounds, `None` when empty.
    fn inclusive<R: RangeBounds<usize>>(&self, range: R) -> Option<(usize, usize)> {
        let left = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.checked_add(1)?,
            Bound::Unbounded => 0,
        };
        let right = match range.end_bound() {
            Bound::Included(&e) => e,
            Bound::Excluded(&e) => e.checked_sub(1)?,
            Bound::Unbounded => self.len.checked_sub(1)?,
        };
        if left > right {
            return None;
        }
        return Some((left, right));
    }
}

impl<V: Value, F: Fn(V, V) -> V> fmt::Debug for RangeTree<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeTree")
            .field("values", &self.to_vec())
            .field("capacity", &self.capacity)
            .field("neutral", &self.neutral)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<V: Value, F: Fn(V, V) -> V> RangeTree<V, F> {
        fn assert_invariants(&self) {
            for i in 1..self.capacity {
                let expected = (self.combine)(self.shifted(2 * i), self.shifted(2 * i + 1));
                assert_eq!(self.aggregate[i], expected, "stale aggregate at node {}", i);
            }
            for k in self.len..self.capacity {
                let leaf = self.capacity + k;
                assert_eq!(self.aggregate[leaf], self.neutral, "padding leaf {} not neutral", k);
                assert_eq!(self.pending[leaf], V::ZERO, "padding leaf {} has pending", k);
            }
        }

        fn pending_is_clear(&self) -> bool {
            return self.pending.iter().all(|&p| p == V::ZERO);
        }
    }

    #[test]
    fn construction_rounds_capacity_up() {
        assert_eq!(RangeTree::new_min(Vec::<i32>::new()).capacity(), 1);
        assert_eq!(RangeTree::new_min([1]).capacity(), 1);
        assert_eq!(RangeTree::new_min([1, 2, 3]).capacity(), 4);
        assert_eq!(RangeTree::new_min([0; 8]).capacity(), 8);
        assert_eq!(RangeTree::new_min([0; 9]).capacity(), 16);
    }

    #[test]
    fn construction_aggregates_bottom_up() {
        let tree = RangeTree::new_min([5, 3, 8]);
        assert_eq!(tree.aggregate[1], 3);
        assert!(tree.pending_is_clear());
        tree.assert_invariants();
    }

    #[test]
    fn padding_leaves_are_neutral() {
        let tree = RangeTree::new_min([5, 3, 8]);
        assert_eq!(tree.aggregate[4 + 3], i32::MAX);
        assert_eq!(tree.aggregate[3], 8);

        let tree = RangeTree::new_max([-5, -3, -8]);
        assert_eq!(tree.aggregate[4 + 3], i32::MIN);
        assert_eq!(tree.aggregate[3], -8);
    }

    #[test]
    fn push_relocates_pending() {
        let mut tree = RangeTree::new_min([1, 2, 3, 4]);
        tree.update(0, 3, 10);
        assert_eq!(tree.pending[1], 10);

        let before = tree.to_vec();
        tree.push(1);
        assert_eq!(tree.pending[1], 0);
        assert_eq!(tree.pending[2], 10);
        assert_eq!(tree.pending[3], 10);
        assert_eq!(tree.to_vec(), before);
    }

    #[test]
    fn push_on_leaf_is_noop() {
        let mut tree = RangeTree::new_min([1, 2]);
        tree.update(1, 1, 7);
        assert_eq!(tree.pending[3], 7);
        tree.push(3);
        assert_eq!(tree.pending[3], 7);
        assert_eq!(tree.get(1), Some(9));
    }

    #[test]
    fn push_without_pending_is_noop() {
        let mut tree = RangeTree::new_min([4, 2, 6, 1]);
        let aggregate = tree.aggregate.clone();
        tree.push(1);
        tree.push(2);
        assert_eq!(tree.aggregate, aggregate);
        assert!(tree.pending_is_clear());
    }

    #[test]
    fn concrete_scenario() {
        let mut tree = RangeTree::new_min([5, 3, 8]);
        assert_eq!(tree.query(0, 2), 3);
        tree.update(0, 1, 10);
        assert_eq!(tree.to_vec(), vec![15, 13, 8]);
        assert_eq!(tree.query(0, 2), 8);
        assert_eq!(tree.query(0, 1), 13);
        tree.update(2, 2, -100);
        assert_eq!(tree.query(2, 2), -92);
        assert_eq!(tree.query(0, 2), -92);
        tree.assert_invariants();
    }

    #[test]
    fn update_covering_node_defers_to_pending() {
        let mut tree = RangeTree::new_min([1, 2, 3, 4, 5, 6, 7, 8]);
        tree.update(0, 3, 5);
        // [0, 3] is exactly node 2
        assert_eq!(tree.pending[2], 5);
        assert_eq!(tree.pending[4], 0);
        assert_eq!(tree.aggregate[1], 5);
        tree.assert_invariants();
    }

    #[test]
    fn query_pushes_partial_nodes() {
        let mut tree = RangeTree::new_min([1, 2, 3, 4]);
        tree.update(0, 3, 10);
        assert_eq!(tree.query(1, 2), 12);
        assert_eq!(tree.pending[1], 0);
        assert_eq!(tree.pending[2], 0);
        assert_eq!(tree.pending[4], 10);
        assert_eq!(tree.pending[5], 10);
        tree.assert_invariants();
    }

    #[test]
    fn update_clamps_right_bound() {
        let mut tree = RangeTree::new_min([5, 3, 8]);
        tree.update(1, 100, 1);
        assert_eq!(tree.to_vec(), vec![5, 4, 9]);
        tree.assert_invariants();
    }

    #[test]
    fn update_outside_domain_is_noop() {
        let mut tree = RangeTree::new_min([5, 3, 8]);
        tree.update(3, 3, 1);
        tree.update(5, 9, 1);
        tree.update(2, 1, 1);
        assert_eq!(tree.to_vec(), vec![5, 3, 8]);
        assert!(tree.pending_is_clear());
    }

    #[test]
    fn query_past_end_is_neutral() {
        let mut tree = RangeTree::new_min([5, 3, 8]);
        assert_eq!(tree.query(0, 3), i32::MAX);
        assert_eq!(tree.query(2, 1), i32::MAX);
        assert_eq!(tree.query(3, 3), i32::MAX);
    }

    #[test]
    fn empty_tree() {
        let mut tree = RangeTree::new_min(Vec::<i64>::new());
        assert!(tree.is_empty());
        tree.update(0, 0, 5);
        assert_eq!(tree.query(0, 0), i64::MAX);
        assert_eq!(tree.get(0), None);
        assert!(tree.to_vec().is_empty());
    }

    #[test]
    fn single_element() {
        let mut tree = RangeTree::new_min([7u32]);
        tree.update(0, 0, 3);
        assert_eq!(tree.query(0, 0), 10);
        assert_eq!(tree.query_range(..), 10);
    }

    #[test]
    fn range_front_ends() {
        let mut tree = RangeTree::new_min([5, 3, 8, 1, 9]);
        assert_eq!(tree.query_range(..), 1);
        assert_eq!(tree.query_range(0..3), 3);
        assert_eq!(tree.query_range(..=2), 3);
        assert_eq!(tree.query_range(4..), 9);
        assert_eq!(tree.query_range(2..2), i32::MAX);
        assert_eq!(tree.query_range(0..6), i32::MAX);

        tree.update_range(1..4, 2);
        assert_eq!(tree.to_vec(), vec![5, 5, 10, 3, 9]);
        tree.update_range(.., -1);
        assert_eq!(tree.to_vec(), vec![4, 4, 9, 2, 8]);
        tree.update_range(3..3, 100);
        assert_eq!(tree.to_vec(), vec![4, 4, 9, 2, 8]);
        tree.assert_invariants();
    }

    #[test]
    fn custom_operator() {
        let mut tree = RangeTree::new([3i64, 1, 4, 1, 5], |a: i64, b: i64| a.max(b), i64::MIN);
        assert_eq!(tree.query(0, 4), 5);
        tree.update(0, 2, 10);
        assert_eq!(tree.query(0, 4), 14);
        assert_eq!(tree.query(3, 4), 5);
    }

    #[test]
    fn get_does_not_reconcile() {
        let mut tree = RangeTree::new_min([1, 2, 3, 4]);
        tree.update(0, 3, 1);
        let pending = tree.pending.clone();
        assert_eq!(tree.get(2), Some(4));
        assert_eq!(tree.pending, pending);
    }

    #[test]
    fn pending_sum_may_leave_value_range() {
        let mut tree = RangeTree::new_min([-2_000_000_000i32, 5]);
        tree.update(0, 0, 2_000_000_000);
        tree.update(0, 0, 2_000_000_000);
        assert_eq!(tree.query(0, 0), 2_000_000_000);
        tree.update(0, 0, -2_000_000_000);
        assert_eq!(tree.get(0), Some(0));
        assert_eq!(tree.query(0, 1), 0);
        tree.assert_invariants();
    }

    #[test]
    fn debug_shows_logical_values() {
        let mut tree = RangeTree::new_min([1, 2]);
        tree.update(0, 1, 1);
        let text = format!("{:?}", tree);
        assert!(text.contains("values: [2, 3]"), "{}", text);
    }
}
