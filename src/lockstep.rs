//! Lockstep comparison of `RangeTree` against the brute-force reference.
//!
//! Both structures start from the trace's initial array and receive every op
//! in order. The first query on which they disagree ends the run; there is no
//! recovering from a divergence.

use std::fmt;

use crate::op::{Op, Trace};
use crate::reference::BruteForce;
use crate::tree::RangeTree;
use crate::value::Value;

/// State after one op, handed to the observer.
#[derive(Clone, Copy, Debug)]
pub struct Step<'a, V> {
    /// Zero-based position of the op in the trace.
    pub index: usize,
    pub op: Op<V>,
    /// Result of a query, identical for both structures.
    pub result: Option<V>,
    /// Reference contents after the op.
    pub data: &'a [V],
}

/// Totals of a run that never diverged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub updates: usize,
    pub queries: usize,
}

/// Error returned when the tree disagrees with the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence<V> {
    /// Zero-based position of the failing op in the trace.
    pub step: usize,
    pub op: Op<V>,
    /// What the reference returned.
    pub expected: V,
    /// What the tree returned.
    pub actual: V,
}

impl<V: fmt::Display> fmt::Display for Divergence<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} ({}): expected {}, got {}",
            self.step, self.op, self.expected, self.actual
        )
    }
}

impl<V: fmt::Debug + fmt::Display> std::error::Error for Divergence<V> {}

/// Replay `trace` against a min tree and the reference.
pub fn run<V, O>(trace: &Trace<V>, mut observe: O) -> Result<Report, Divergence<V>>
where
    V: Value,
    O: FnMut(&Step<'_, V>),
{
    let mut tree = RangeTree::new_min(trace.values.iter().copied());
    let mut slow = BruteForce::new(trace.values.iter().copied());
    let mut report = Report::default();

    for (index, &op) in trace.ops.iter().enumerate() {
        let result = match op {
            Op::Update { left, right, delta } => {
                tree.update(left, right, delta);
                slow.update(left, right, delta);
                report.updates += 1;
                None
            }
            Op::Query { left, right } => {
                let expected = slow.query(left, right);
                let actual = tree.query(left, right);
                report.queries += 1;
                if expected != actual {
                    #[cfg(feature = "tracing")]
                    tracing::error!(step = index, expected = ?expected, actual = ?actual, "tree diverged");

                    return Err(Divergence { step: index, op, expected, actual });
                }
                Some(actual)
            }
        };

        observe(&Step { index, op, result, data: slow.as_slice() });
    }

    return Ok(report);
}
