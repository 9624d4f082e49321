//! Recorded calls against a range tree.
//!
//! A `Trace` is an initial array plus the sequence of updates and queries
//! applied to it. Traces are what the verification binaries generate, check
//! and, with the `serde` feature, dump to disk when a check fails so the run
//! can be replayed later.

use std::fmt;

#[cfg(feature = "serde")]
use serde::de::DeserializeOwned;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One call against a tree, with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Op<V> {
    /// Add `delta` to every element of `[left, right]`.
    Update { left: usize, right: usize, delta: V },
    /// Aggregate `[left, right]`.
    Query { left: usize, right: usize },
}

impl<V: fmt::Display> fmt::Display for Op<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Op::Update { left, right, delta } => {
                write!(f, "CHANGE: from {} to {} at {}", left, right, delta)
            }
            Op::Query { left, right } => write!(f, "Get: from {} to {}", left, right),
        };
    }
}

/// An initial array and the calls made against it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trace<V> {
    pub values: Vec<V>,
    pub ops: Vec<Op<V>>,
}

impl<V> Trace<V> {
    pub fn new(values: Vec<V>) -> Trace<V> {
        return Trace { values, ops: Vec::new() };
    }

    pub fn update(&mut self, left: usize, right: usize, delta: V) {
        self.ops.push(Op::Update { left, right, delta });
    }

    pub fn query(&mut self, left: usize, right: usize) {
        self.ops.push(Op::Query { left, right });
    }

    pub fn update_count(&self) -> usize {
        return self.ops.iter().filter(|op| matches!(op, Op::Update { .. })).count();
    }

    pub fn query_count(&self) -> usize {
        return self.ops.len() - self.update_count();
    }
}

/// Error returned when a trace cannot be saved or loaded.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum TraceError {
    /// The file could not be read or written.
    Io(std::io::Error),
    /// The contents are not a valid trace.
    Json(serde_json::Error),
}

#[cfg(feature = "serde")]
impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            TraceError::Io(e) => write!(f, "trace io error: {}", e),
            TraceError::Json(e) => write!(f, "malformed trace: {}", e),
        };
    }
}

#[cfg(feature = "serde")]
impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        return match self {
            TraceError::Io(e) => Some(e),
            TraceError::Json(e) => Some(e),
        };
    }
}

#[cfg(feature = "serde")]
impl From<std::io::Error> for TraceError {
    fn from(e: std::io::Error) -> TraceError {
        return TraceError::Io(e);
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for TraceError {
    fn from(e: serde_json::Error) -> TraceError {
        return TraceError::Json(e);
    }
}

#[cfg(feature = "serde")]
impl<V: Serialize + DeserializeOwned> Trace<V> {
    /// Load a trace from `.json`, or gzip-compressed `.json.gz`.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Trace<V>, TraceError> {
        use std::io::{BufReader, Read};

        let path = path.as_ref();
        let mut reader = BufReader::new(std::fs::File::open(path)?);
        let mut raw_json = Vec::new();

        if path.extension().is_some_and(|ext| ext == "gz") {
            let mut decoder = flate2::bufread::GzDecoder::new(reader);
            decoder.read_to_end(&mut raw_json)?;
        } else {
            reader.read_to_end(&mut raw_json)?;
        }

        return Ok(serde_json::from_slice(&raw_json)?);
    }

    /// Write the trace as pretty-printed JSON.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), TraceError> {
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        return Ok(());
    }
}
