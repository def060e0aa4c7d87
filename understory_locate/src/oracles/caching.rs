// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoizing oracle wrapper.

use core::cell::{Cell, RefCell};
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::oracle::{Oracle, Probe};
use crate::types::Coordinate;

/// Wraps an oracle and remembers the answer to every exact probe it has seen.
///
/// Useful when the inner oracle is expensive (e.g. a remote service) and the
/// same searches are repeated against a static target set. Probes are keyed on
/// the bit patterns of `(lat, lon, radius)`, so only identical probes hit the
/// cache. [`Probe::Indeterminate`] answers are never cached.
///
/// The cache uses interior mutability without locking, so the wrapper is not
/// `Sync`. Call [`invalidate`][Self::invalidate] after the target set changes.
pub struct CachingOracle<O> {
    inner: O,
    memo: RefCell<HashMap<[u64; 3], Probe>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<O> Debug for CachingOracle<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachingOracle")
            .field("entries", &self.memo.borrow().len())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish_non_exhaustive()
    }
}

impl<O> CachingOracle<O> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            memo: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Probes answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Probes forwarded to the inner oracle.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Drop every cached answer. Counters are kept.
    pub fn invalidate(&self) {
        self.memo.borrow_mut().clear();
    }

    /// The wrapped oracle.
    pub const fn inner(&self) -> &O {
        &self.inner
    }

    /// Mutable access to the wrapped oracle. Clears the cache.
    pub fn inner_mut(&mut self) -> &mut O {
        self.memo.get_mut().clear();
        &mut self.inner
    }

    /// Unwrap, discarding the cache.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Oracle> Oracle for CachingOracle<O> {
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        let key = [center.lat.to_bits(), center.lon.to_bits(), radius.to_bits()];
        if let Some(&answer) = self.memo.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return answer;
        }
        self.misses.set(self.misses.get() + 1);
        let answer = self.inner.exists(center, radius);
        if answer != Probe::Indeterminate {
            let _ = self.memo.borrow_mut().insert(key, answer);
        }
        answer
    }
}
