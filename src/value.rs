//! Element values stored in a range tree.
//!
//! A value has to support two things: the aggregation operator (chosen by the
//! caller) and an additive delta that can be buffered at a node and later
//! pushed down to its children. The additive identity is the "nothing
//! pending" state, and the numeric bounds are the neutral elements of the
//! min and max operators.

use std::fmt::Debug;
use std::ops::Add;

/// A trait for values that can be stored in a range tree.
pub trait Value: Copy + Eq + Ord + Debug + Add<Output = Self> {
    /// Additive identity. A node with this pending delta is fully propagated.
    const ZERO: Self;

    /// Smallest representable value, the neutral element of `max`.
    const MIN: Self;

    /// Largest representable value, the neutral element of `min`.
    const MAX: Self;

    /// Two's-complement addition, used to accumulate pending deltas.
    fn wrapping_add(self, other: Self) -> Self;
}

macro_rules! impl_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl Value for $t {
                const ZERO: Self = 0;
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn wrapping_add(self, other: Self) -> Self {
                    <$t>::wrapping_add(self, other)
                }
            }
        )*
    };
}

impl_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
