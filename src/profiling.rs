//! Simple profiling counters for understanding hot paths.
//!
//! Counters are process-wide and use relaxed ordering, so they are only
//! meaningful as rough totals. `reset` before a measured run.

use std::sync::atomic::{AtomicU64, Ordering};

pub static UPDATES: AtomicU64 = AtomicU64::new(0);
pub static QUERIES: AtomicU64 = AtomicU64::new(0);
pub static NODE_VISITS: AtomicU64 = AtomicU64::new(0);
pub static PUSHES: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn update() {
    UPDATES.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn query() {
    QUERIES.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn visit() {
    NODE_VISITS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn push() {
    PUSHES.fetch_add(1, Ordering::Relaxed);
}

pub fn reset() {
    UPDATES.store(0, Ordering::Relaxed);
    QUERIES.store(0, Ordering::Relaxed);
    NODE_VISITS.store(0, Ordering::Relaxed);
    PUSHES.store(0, Ordering::Relaxed);
}

pub fn report() -> String {
    let updates = UPDATES.load(Ordering::Relaxed);
    let queries = QUERIES.load(Ordering::Relaxed);
    let visits = NODE_VISITS.load(Ordering::Relaxed);
    let pushes = PUSHES.load(Ordering::Relaxed);
    let calls = updates + queries;
    let per_call = if calls > 0 { visits as f64 / calls as f64 } else { 0.0 };

    format!(
        "Updates: {}, Queries: {}, Visits: {} ({:.1}/call), Pushes: {}",
        updates, queries, visits, per_call, pushes
    )
}
