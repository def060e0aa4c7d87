// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Probe-counting oracle wrapper.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::oracle::{Oracle, Probe};
use crate::types::Coordinate;

/// Wraps an oracle and counts every probe forwarded to it.
///
/// The counter is atomic, so the wrapper stays `Sync` when the inner oracle is.
#[derive(Debug, Default)]
pub struct CountingOracle<O> {
    inner: O,
    calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    /// Wrap `inner` with a zeroed counter.
    pub const fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Probes forwarded so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Zero the counter.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }

    /// The wrapped oracle.
    pub const fn inner(&self) -> &O {
        &self.inner
    }

    /// Mutable access to the wrapped oracle, e.g. to move targets between searches.
    pub fn inner_mut(&mut self) -> &mut O {
        &mut self.inner
    }

    /// Unwrap, discarding the counter.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.exists(center, radius)
    }
}
