//! Lazytree - range updates and range aggregates in logarithmic time.
//!
//! A `RangeTree` holds a fixed-size array of integers and supports adding a
//! delta to every element of an index range and aggregating (minimum by
//! default) an index range. Updates are buffered per node and only pushed
//! down to children when a later call needs to look inside.
//!
//! # Quick Start
//!
//! ```
//! use lazytree::RangeTree;
//!
//! let mut tree = RangeTree::new_min([5, 3, 8]);
//! assert_eq!(tree.query(0, 2), 3);
//!
//! tree.update(0, 1, 10);
//! assert_eq!(tree.query(0, 2), 8);
//! assert_eq!(tree.query(0, 1), 13);
//!
//! // Past-the-end and inverted ranges select nothing.
//! assert_eq!(tree.query(1, 3), i32::MAX);
//! ```
//!
//! # Features
//!
//! - `tracing`: emit `trace!` events from the tree operations
//! - `serde`: serialize `op::Trace`, load and save traces as JSON
//! - `harness`: the `lazytree` and `replay` verification binaries

pub mod lockstep;
pub mod op;
pub mod profiling;
pub mod reference;
#[cfg(feature = "harness")]
pub mod scenario;
pub mod tree;
pub mod value;

pub use tree::RangeTree;
pub use value::Value;
