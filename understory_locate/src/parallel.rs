// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-threaded traversal on the rayon pool (feature `parallel`).
//!
//! Sibling regions are disjoint, so they are searched concurrently. Appends
//! to the shared result go through a mutex that also enforces the result cap
//! and duplicate merging; counters are atomics. The order of hits depends on
//! scheduling.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::cancel::CancelFlag;
use crate::config::SearchConfig;
use crate::error::LocateError;
use crate::oracle::Oracle;
use crate::search::{Hits, Locator, Node, Offer, SearchOutcome, SearchStats, visit};
use crate::types::{Coordinate, Region};

#[derive(Debug, Default)]
struct AtomicStats {
    visited: AtomicUsize,
    oracle_calls: AtomicUsize,
    pruned: AtomicUsize,
    discarded: AtomicUsize,
    merged: AtomicUsize,
    max_depth: AtomicUsize,
}

impl AtomicStats {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> SearchStats {
        SearchStats {
            visited: self.visited.load(Ordering::Relaxed),
            oracle_calls: self.oracle_calls.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
            max_depth: self.max_depth.load(Ordering::Relaxed),
        }
    }
}

struct ParWalk<'a, O: ?Sized> {
    oracle: &'a O,
    config: &'a SearchConfig,
    cancel: Option<&'a CancelFlag>,
    hits: Mutex<Hits>,
    full: AtomicBool,
    stats: AtomicStats,
}

impl<O: Oracle + Sync + ?Sized> ParWalk<'_, O> {
    fn found(&self) -> usize {
        self.hits.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn descend(&self, region: Region, depth: usize) -> Result<(), LocateError> {
        if self.cancel.is_some_and(CancelFlag::is_cancelled) {
            return Err(LocateError::Cancelled {
                found: self.found(),
            });
        }
        AtomicStats::bump(&self.stats.visited);
        self.stats.max_depth.fetch_max(depth, Ordering::Relaxed);

        match visit(self.oracle, self.config, region, self.full.load(Ordering::Acquire))? {
            Node::Discard => AtomicStats::bump(&self.stats.discarded),
            Node::Prune => {
                AtomicStats::bump(&self.stats.oracle_calls);
                AtomicStats::bump(&self.stats.pruned);
            }
            Node::Hit {
                center,
                merge_radius,
            } => {
                AtomicStats::bump(&self.stats.oracle_calls);
                self.accept(center, merge_radius);
            }
            Node::Split(children) => {
                AtomicStats::bump(&self.stats.oracle_calls);
                children
                    .as_slice()
                    .par_iter()
                    .try_for_each(|&child| self.descend(child, depth + 1))?;
            }
        }
        Ok(())
    }

    /// Compare-and-append under the lock.
    fn accept(&self, center: Coordinate, merge_radius: f64) {
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        match hits.offer(center, merge_radius) {
            Offer::Accepted => {
                #[cfg(feature = "tracing")]
                tracing::trace!(lat = center.lat, lon = center.lon, "hit");
            }
            Offer::Merged => AtomicStats::bump(&self.stats.merged),
            Offer::Full => {}
        }
        if hits.is_full() {
            self.full.store(true, Ordering::Release);
        }
    }
}

impl<O: Oracle + Sync> Locator<O> {
    /// Parallel counterpart of [`Locator::search`].
    ///
    /// Returns the same set of hits as a sequential search when no cap
    /// applies, modulo which duplicate survives merging; with a cap, any `k`
    /// hits that a sequential search could find. Hit order is unspecified.
    /// The configured [`Traversal`][crate::Traversal] is ignored.
    ///
    /// # Errors
    ///
    /// See [`Locator::search`].
    pub fn par_search(&self, limit: Option<usize>) -> Result<SearchOutcome, LocateError> {
        let seed = self.seed()?;
        self.par_run(seed, limit)
    }

    /// Parallel counterpart of [`Locator::search_region`].
    ///
    /// # Errors
    ///
    /// See [`Locator::search_region`].
    pub fn par_search_region(
        &self,
        region: Region,
        limit: Option<usize>,
    ) -> Result<SearchOutcome, LocateError> {
        self.check_region(region)?;
        self.par_run(region, limit)
    }

    /// Parallel counterpart of [`Locator::find_all`].
    ///
    /// # Errors
    ///
    /// See [`Locator::search`].
    pub fn par_find_all(&self) -> Result<Vec<Coordinate>, LocateError> {
        Ok(self.par_search(None)?.hits)
    }

    fn par_run(&self, seed: Region, limit: Option<usize>) -> Result<SearchOutcome, LocateError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("locate_parallel", limit = ?limit);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let hits = Hits::new(limit, self.config().merge_duplicates);
        let walk = ParWalk {
            oracle: self.oracle(),
            config: self.config(),
            cancel: self.cancel_flag(),
            full: AtomicBool::new(hits.is_full()),
            hits: Mutex::new(hits),
            stats: AtomicStats::default(),
        };
        walk.descend(seed, 0)?;

        let stats = walk.stats.snapshot();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            visited = stats.visited,
            oracle_calls = stats.oracle_calls,
            "parallel search finished"
        );
        let hits = walk
            .hits
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_vec();
        Ok(SearchOutcome { hits, stats })
    }
}
