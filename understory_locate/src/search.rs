// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Locator` API and the region searcher behind it.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::cancel::CancelFlag;
use crate::config::{SearchConfig, Split, Traversal};
use crate::error::LocateError;
use crate::oracle::{Oracle, Probe};
use crate::types::{Coordinate, Region};
use crate::util::cell_coord;

/// Relative slack on the duplicate-merge distance.
const MERGE_SLACK: f64 = 1e-6;

/// Counters collected during one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Regions entered, including discarded ones.
    pub visited: usize,
    /// Covering-disc probes issued.
    pub oracle_calls: usize,
    /// Regions whose probe reported no target.
    pub pruned: usize,
    /// Regions dropped without a probe: empty, outside the domain, or after
    /// the result cap was reached.
    pub discarded: usize,
    /// Terminal hits dropped as duplicates of an earlier hit.
    pub merged: usize,
    /// Deepest subdivision level entered; the seed region is level 0.
    pub max_depth: usize,
}

/// Hits and counters produced by [`Locator::search`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    /// Located targets in traversal order, each accurate to within the precision.
    pub hits: Vec<Coordinate>,
    /// Traversal counters.
    pub stats: SearchStats,
}

/// Subregions of a region that must be searched further.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Children {
    Four([Region; 4]),
    Two([Region; 2]),
}

impl Children {
    #[inline]
    pub(crate) fn as_slice(&self) -> &[Region] {
        match self {
            Self::Four(q) => q,
            Self::Two(h) => h,
        }
    }
}

/// What a single region visit decided.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Node {
    /// Dropped before probing.
    Discard,
    /// Probe answered absent.
    Prune,
    /// Terminal region with a target; `merge_radius` bounds duplicate reports.
    Hit {
        center: Coordinate,
        merge_radius: f64,
    },
    /// Probe answered present and the region is still coarse.
    Split(Children),
}

/// Distance within which a terminal hit duplicates an earlier one.
///
/// Two cells whose covering discs both contain a target have centers at most
/// two covering radii apart.
#[inline]
pub(crate) fn merge_radius(cell: &Region) -> f64 {
    2.0 * cell.covering_radius() * (1.0 + MERGE_SLACK)
}

/// Decide what to do with one region.
///
/// Issues at most one oracle probe. `full` is whether the result cap has
/// already been reached.
pub(crate) fn visit<O: Oracle + ?Sized>(
    oracle: &O,
    config: &SearchConfig,
    region: Region,
    full: bool,
) -> Result<Node, LocateError> {
    if full || region.is_empty() || !config.domain.contains(&region) {
        return Ok(Node::Discard);
    }

    let center = region.center();
    let radius = region.covering_radius();
    match oracle.exists(center, radius) {
        Probe::Absent => Ok(Node::Prune),
        Probe::Indeterminate => Err(LocateError::Indeterminate { center, radius }),
        Probe::Present if config.is_terminal(&region) => Ok(Node::Hit {
            center,
            merge_radius: merge_radius(&region),
        }),
        Probe::Present => Ok(Node::Split(match config.split {
            Split::Quadrisect => Children::Four(region.quadrants()),
            Split::Bisect => Children::Two(region.halves()),
        })),
    }
}

/// Result of offering a terminal hit to [`Hits`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Offer {
    Accepted,
    Merged,
    Full,
}

/// Result accumulator enforcing the cap and duplicate merging.
///
/// With merging on, accepted hits are also bucketed in a grid whose cells are
/// at least twice the merge radius, so a duplicate of a new hit can only sit
/// in the 3x3 block of buckets around it.
#[derive(Clone, Debug)]
pub(crate) struct Hits {
    found: Vec<Coordinate>,
    limit: usize,
    merge: bool,
    buckets: HashMap<(i32, i32), Vec<usize>>,
    bucket_size: f64,
}

impl Hits {
    pub(crate) fn new(limit: Option<usize>, merge: bool) -> Self {
        Self {
            found: Vec::new(),
            limit: limit.unwrap_or(usize::MAX),
            merge,
            buckets: HashMap::new(),
            bucket_size: 0.0,
        }
    }

    fn bucket_of(&self, c: Coordinate) -> (i32, i32) {
        (
            cell_coord(c.lat, 0.0, self.bucket_size),
            cell_coord(c.lon, 0.0, self.bucket_size),
        )
    }

    /// Regrid every accepted hit with buckets of side `size`.
    fn rebucket(&mut self, size: f64) {
        self.bucket_size = size;
        self.buckets.clear();
        for (i, &h) in self.found.iter().enumerate() {
            let key = self.bucket_of(h);
            self.buckets.entry(key).or_default().push(i);
        }
    }

    fn has_duplicate(&self, key: (i32, i32), center: Coordinate, merge_radius: f64) -> bool {
        let (ix, iy) = key;
        (ix.saturating_sub(1)..=ix.saturating_add(1)).any(|x| {
            (iy.saturating_sub(1)..=iy.saturating_add(1)).any(|y| {
                self.buckets.get(&(x, y)).is_some_and(|bucket| {
                    bucket.iter().any(|&i| {
                        self.found
                            .get(i)
                            .is_some_and(|h| h.distance(center) <= merge_radius)
                    })
                })
            })
        })
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.found.len() >= self.limit
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.found.len()
    }

    /// Append `center` unless the cap is reached or it duplicates an earlier hit.
    pub(crate) fn offer(&mut self, center: Coordinate, merge_radius: f64) -> Offer {
        if self.is_full() {
            return Offer::Full;
        }
        if self.merge {
            if merge_radius > self.bucket_size / 2.0 {
                self.rebucket(2.0 * merge_radius);
            }
            let key = self.bucket_of(center);
            if self.has_duplicate(key, center, merge_radius) {
                return Offer::Merged;
            }
            self.buckets.entry(key).or_default().push(self.found.len());
        }
        self.found.push(center);
        Offer::Accepted
    }

    pub(crate) fn into_vec(self) -> Vec<Coordinate> {
        self.found
    }
}

/// Sequential depth-first walk shared by both traversals.
struct Walk<'a, O: ?Sized> {
    oracle: &'a O,
    config: &'a SearchConfig,
    cancel: Option<&'a CancelFlag>,
    hits: Hits,
    stats: SearchStats,
}

impl<O: Oracle + ?Sized> Walk<'_, O> {
    /// Enter one region and record what happened. Returns the children to descend into.
    fn step(&mut self, region: Region, depth: usize) -> Result<Option<Children>, LocateError> {
        if self.cancel.is_some_and(CancelFlag::is_cancelled) {
            return Err(LocateError::Cancelled {
                found: self.hits.len(),
            });
        }
        self.stats.visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        match visit(self.oracle, self.config, region, self.hits.is_full())? {
            Node::Discard => self.stats.discarded += 1,
            Node::Prune => {
                self.stats.oracle_calls += 1;
                self.stats.pruned += 1;
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    lat = region.origin.lat,
                    lon = region.origin.lon,
                    depth,
                    "pruned"
                );
            }
            Node::Hit {
                center,
                merge_radius,
            } => {
                self.stats.oracle_calls += 1;
                match self.hits.offer(center, merge_radius) {
                    Offer::Accepted => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(lat = center.lat, lon = center.lon, depth, "hit");
                    }
                    Offer::Merged => self.stats.merged += 1,
                    Offer::Full => {}
                }
            }
            Node::Split(children) => {
                self.stats.oracle_calls += 1;
                return Ok(Some(children));
            }
        }
        Ok(None)
    }

    fn descend(&mut self, region: Region, depth: usize) -> Result<(), LocateError> {
        if let Some(children) = self.step(region, depth)? {
            for &child in children.as_slice() {
                self.descend(child, depth + 1)?;
            }
        }
        Ok(())
    }

    fn drain(&mut self, seed: Region) -> Result<(), LocateError> {
        let mut stack = vec![(seed, 0_usize)];
        while let Some((region, depth)) = stack.pop() {
            if let Some(children) = self.step(region, depth)? {
                // Reversed so the first child is popped first.
                stack.extend(children.as_slice().iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        Ok(())
    }
}

/// Oracle-driven spatial search over a configured domain.
///
/// A `Locator` owns its oracle and configuration and keeps no state between
/// queries; repeated queries against an unchanged target set return
/// identical results.
pub struct Locator<O> {
    oracle: O,
    config: SearchConfig,
    cancel: Option<CancelFlag>,
}

impl<O> Debug for Locator<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Locator")
            .field("config", &self.config)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl<O: Oracle> Locator<O> {
    /// Create a locator with [`SearchConfig::default`].
    pub fn new(oracle: O) -> Self {
        Self::with_config(oracle, SearchConfig::default())
    }

    /// Create a locator with an explicit configuration.
    ///
    /// The configuration is validated when a search starts.
    pub fn with_config(oracle: O, config: SearchConfig) -> Self {
        Self {
            oracle,
            config,
            cancel: None,
        }
    }

    /// Attach a cancellation flag checked before every region visit.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// The oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the oracle, e.g. to change the target set between queries.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Unwrap the oracle.
    pub fn into_oracle(self) -> O {
        self.oracle
    }

    /// Locate every target in the domain.
    ///
    /// # Errors
    ///
    /// See [`Locator::search`].
    pub fn find_all(&self) -> Result<Vec<Coordinate>, LocateError> {
        Ok(self.search(None)?.hits)
    }

    /// Locate at most `k` targets, stopping as soon as `k` are found.
    ///
    /// The result is a prefix of what [`find_all`][Self::find_all] returns.
    /// `k == 0` returns immediately without probing the oracle.
    ///
    /// # Errors
    ///
    /// See [`Locator::search`].
    pub fn find_at_most(&self, k: usize) -> Result<Vec<Coordinate>, LocateError> {
        Ok(self.search(Some(k))?.hits)
    }

    /// Search the whole domain, returning hits and traversal counters.
    ///
    /// Quadrisection starts from the domain's enclosing square; bisection
    /// from the domain rectangle itself.
    ///
    /// # Errors
    ///
    /// - [`LocateError::InvalidDomain`], [`LocateError::InvalidPrecision`] or
    ///   [`LocateError::PrecisionTooFine`] for a bad configuration.
    /// - [`LocateError::NotSquare`] when quadrisecting a non-square domain.
    /// - [`LocateError::Indeterminate`] when the oracle cannot answer a probe.
    /// - [`LocateError::Cancelled`] when the attached flag is set.
    pub fn search(&self, limit: Option<usize>) -> Result<SearchOutcome, LocateError> {
        let seed = self.seed()?;
        self.run(seed, limit)
    }

    /// Search starting from a caller-supplied region instead of the whole domain.
    ///
    /// # Errors
    ///
    /// Everything [`Locator::search`] reports, plus [`LocateError::InvalidRegion`]
    /// for an empty, non-finite, or out-of-domain region, and
    /// [`LocateError::NotSquare`] for a non-square region under quadrisection.
    pub fn search_region(
        &self,
        region: Region,
        limit: Option<usize>,
    ) -> Result<SearchOutcome, LocateError> {
        self.check_region(region)?;
        self.run(region, limit)
    }

    pub(crate) fn seed(&self) -> Result<Region, LocateError> {
        self.config.validate()?;
        let domain = &self.config.domain;
        match self.config.split {
            Split::Quadrisect if !domain.is_square() => Err(LocateError::NotSquare {
                lat_size: domain.lat_extent(),
                lon_size: domain.lon_extent(),
            }),
            Split::Quadrisect => Ok(domain.enclosing_square()),
            Split::Bisect => Ok(domain.bounds()),
        }
    }

    pub(crate) fn check_region(&self, region: Region) -> Result<(), LocateError> {
        self.config.validate()?;
        if !region.is_finite() || region.is_empty() || !self.config.domain.contains(&region) {
            return Err(LocateError::InvalidRegion { region });
        }
        if self.config.split == Split::Quadrisect && !region.is_square() {
            return Err(LocateError::NotSquare {
                lat_size: region.lat_size,
                lon_size: region.lon_size,
            });
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn cancel_flag(&self) -> Option<&CancelFlag> {
        self.cancel.as_ref()
    }

    fn run(&self, seed: Region, limit: Option<usize>) -> Result<SearchOutcome, LocateError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("locate", split = ?self.config.split, limit = ?limit);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            lat = seed.origin.lat,
            lon = seed.origin.lon,
            lat_size = seed.lat_size,
            lon_size = seed.lon_size,
            precision = self.config.precision,
            "seeding search"
        );

        let mut walk = Walk {
            oracle: &self.oracle,
            config: &self.config,
            cancel: self.cancel.as_ref(),
            hits: Hits::new(limit, self.config.merge_duplicates),
            stats: SearchStats::default(),
        };
        let result = match self.config.traversal {
            Traversal::Recursive => walk.descend(seed, 0),
            Traversal::Worklist => walk.drain(seed),
        };
        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &result {
                tracing::warn!(error = %err, "search aborted");
            }
        }
        result?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            hits = walk.hits.len(),
            visited = walk.stats.visited,
            oracle_calls = walk.stats.oracle_calls,
            pruned = walk.stats.pruned,
            merged = walk.stats.merged,
            max_depth = walk.stats.max_depth,
            "search finished"
        );
        Ok(SearchOutcome {
            hits: walk.hits.into_vec(),
            stats: walk.stats,
        })
    }
}
