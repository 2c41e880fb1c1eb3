// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared counters for tracking progress across concurrent actors
//!
//! [`Counter`] is the production primitive: every increment is a single
//! atomic read-modify-write, so after N increments from any number of
//! actors the value reads exactly N. [`RacyCounter`] preserves the
//! unsynchronized variant as a documented hazard demonstration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A shared counter safe to increment from any number of actors
///
/// Cloning yields another handle to the same underlying value; pass a
/// clone to each actor instead of sharing through a global.
#[derive(Clone, Debug, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically add one
    pub fn increment(&self) {
        self.add(1);
    }

    /// Atomically add `by`
    pub fn add(&self, by: u64) {
        // Count-only value with no ordering dependency on other memory.
        self.value.fetch_add(by, Ordering::Relaxed);
    }

    /// Point-in-time snapshot of the value
    pub fn read(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// The unsynchronized counter, kept for hazard demonstrations only
///
/// `add` reads and writes the shared value as two separate steps, so
/// concurrent increments can overwrite each other and updates are lost.
/// Nothing else in this crate uses it; use [`Counter`] everywhere the
/// final value matters.
#[derive(Clone, Debug, Default)]
pub struct RacyCounter {
    value: Arc<AtomicU64>,
}

impl RacyCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one without synchronization; may be lost under contention
    pub fn increment(&self) {
        self.add(1);
    }

    /// Add `by` without synchronization; may be lost under contention
    pub fn add(&self, by: u64) {
        let current = self.value.load(Ordering::Relaxed);
        // Widen the window between read and write so the interference is
        // observable even on a single core.
        std::thread::yield_now();
        self.value.store(current + by, Ordering::Relaxed);
    }

    /// Point-in-time snapshot of the value
    pub fn read(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "counter_tests.rs"]
mod tests;
