// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_locate --heading-base-level=0

//! Understory Locate: oracle-driven divide-and-conquer search for point targets.
//!
//! A bounded 2D domain hides a set of point targets (robots, beacons, anything
//! with a position). The only way to learn about them is an [`Oracle`] that
//! answers one question: *is any target within distance `r` of this point?*
//! [`Locator`] turns that oracle into target positions with a given precision
//! while issuing far fewer probes than scanning the domain cell by cell.
//!
//! - The domain is split recursively, into four quadrants or two halves.
//! - Each region is probed once with the smallest disc covering it; a negative
//!   answer prunes the region and everything below it.
//! - Regions reaching the precision that still answer positively are reported
//!   as hits at their center. A target near a cell edge is reported by each
//!   cell whose disc reaches it, unless duplicate merging is switched on.
//!
//! Queries can be capped at `k` hits, restricted to a sub-region, cancelled
//! from another thread, and (feature `parallel`) run on the rayon pool.
//!
//! ## Features
//!
//! - `std` *(default)*: use the standard library for float math.
//! - `libm`: float math through `libm` for `no_std` targets.
//! - `oracle_grid` *(default)*: the grid-bucketed [`oracles::GridOracle`] with `smallvec` cells.
//! - `tracing`: emit spans and events for each query via `tracing`.
//! - `parallel`: [`Locator::par_search`] and friends, backed by `rayon`.
//!
//! # Example
//!
//! ```rust
//! use understory_locate::{Coordinate, Locator, SearchConfig, Split};
//! use understory_locate::oracles::PointSet;
//!
//! let robots = PointSet::from_iter([
//!     Coordinate::new(0.0, 0.0),
//!     Coordinate::new(100.0, 50.0),
//!     Coordinate::new(-50.0, -30.0),
//! ]);
//!
//! // A target near cell edges is reported once per cell whose disc reaches it;
//! // the origin is a corner of four terminal cells.
//! let locator = Locator::new(robots);
//! let found = locator.find_all().unwrap();
//! assert!(found.len() >= 6);
//! assert!(found.iter().all(robots_near));
//!
//! // Merging collapses the duplicates of each target.
//! let merged = SearchConfig::default().with_merge_duplicates(true);
//! let found = Locator::with_config(locator.oracle(), merged).find_all().unwrap();
//! assert_eq!(found.len(), 3);
//!
//! // Stop after the first hit.
//! let first = locator.find_at_most(1).unwrap();
//! assert_eq!(first.len(), 1);
//!
//! // Bisection usually needs fewer probes.
//! let bisect = merged.with_split(Split::Bisect);
//! let outcome = Locator::with_config(locator.oracle(), bisect).search(None).unwrap();
//! assert_eq!(outcome.hits.len(), 3);
//! # fn robots_near(c: &Coordinate) -> bool {
//! #     [(0.0, 0.0), (100.0, 50.0), (-50.0, -30.0)]
//! #         .into_iter()
//! #         .any(|(lat, lon)| c.distance(Coordinate::new(lat, lon)) < 1e-6)
//! # }
//! ```
//!
//! Any closure can act as an oracle through [`oracles::from_fn`].
//!
//! ### Float semantics
//!
//! Domains, regions and precisions must be finite; this is checked before any
//! probe is issued. Covering discs are widened by a few ulps so that targets on
//! region corners are not lost to rounding.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod brute;
mod cancel;
mod config;
mod error;
mod oracle;
pub mod oracles;
#[cfg(feature = "parallel")]
mod parallel;
mod search;
mod types;
pub(crate) mod util;

pub use brute::brute_force_scan;
pub use cancel::CancelFlag;
pub use config::{SearchConfig, Split, Traversal};
pub use error::LocateError;
pub use oracle::{Oracle, Probe};
pub use search::{Locator, SearchOutcome, SearchStats};
pub use types::{Coordinate, Domain, Region};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracles::PointSet;
    use alloc::vec::Vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = SearchConfig::DEFAULT_PRECISION;

    /// Draw `n` targets at least `min_gap` apart inside `(-bound, bound)²`.
    fn scattered<R: Rng>(rng: &mut R, n: usize, bound: f64, min_gap: f64) -> Vec<Coordinate> {
        let mut out: Vec<Coordinate> = Vec::with_capacity(n);
        while out.len() < n {
            let c = Coordinate::new(
                rng.random_range(-bound..bound),
                rng.random_range(-bound..bound),
            );
            if out.iter().all(|t| t.distance(c) >= min_gap) {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn random_fleets_are_found_exactly_once() {
        let mut rng = StdRng::seed_from_u64(0x10ca7e);
        for round in 0..20 {
            let n = rng.random_range(1..=12);
            let targets = scattered(&mut rng, n, 179.0, 1.0);
            for split in [Split::Quadrisect, Split::Bisect] {
                let config = SearchConfig::default()
                    .with_split(split)
                    .with_merge_duplicates(true);
                let set = PointSet::from_iter(targets.iter().copied());
                let locator = Locator::with_config(set, config);
                let hits = locator.find_all().unwrap();
                assert_eq!(hits.len(), n, "round {round} {split:?}: {hits:?}");
                for t in &targets {
                    assert!(
                        hits.iter().any(|h| h.distance(*t) <= EPS),
                        "round {round} {split:?}: missed {t:?}"
                    );
                }
                for h in &hits {
                    assert!(
                        targets.iter().any(|t| t.distance(*h) <= EPS),
                        "round {round} {split:?}: phantom {h:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn random_close_pairs_are_never_lost() {
        let eps = 1.0 / 4096.0;
        let domain = Domain::new(-1.0, -1.0, 1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0xc105e);
        for round in 0..200 {
            let a = Coordinate::new(rng.random_range(-0.9..0.9), rng.random_range(-0.9..0.9));
            let gap = rng.random_range(1.0..3.0) * eps;
            let (dlat, dlon) = [(1.0, 0.0), (0.0, 1.0), (0.6, 0.8), (0.8, -0.6)]
                [rng.random_range(0..4)];
            let b = Coordinate::new(a.lat + dlat * gap, a.lon + dlon * gap);
            let targets = [a, b];

            let config = SearchConfig::new(domain, eps).unwrap();
            let hits = Locator::with_config(PointSet::from_iter(targets), config)
                .find_all()
                .unwrap();
            for t in targets {
                assert!(
                    hits.iter().any(|h| h.distance(t) <= eps),
                    "round {round}: missed {t:?} at gap {gap}"
                );
            }

            // Merged hits keep both targets once they are clear of the merge bound.
            let merged = config.with_merge_duplicates(true);
            let hits = Locator::with_config(PointSet::from_iter(targets), merged)
                .find_all()
                .unwrap();
            assert!(hits.iter().all(|h| targets.iter().any(|t| h.distance(*t) <= eps)));
            if gap > 2.9 * eps {
                assert_eq!(hits.len(), 2, "round {round}: gap {gap}: {hits:?}");
            }
        }
    }

    #[test]
    fn random_caps_are_prefixes() {
        let mut rng = StdRng::seed_from_u64(7);
        let targets = scattered(&mut rng, 9, 150.0, 5.0);
        let locator = Locator::new(PointSet::from_iter(targets));
        let all = locator.find_all().unwrap();
        for _ in 0..10 {
            let k = rng.random_range(0..=all.len() + 2);
            let some = locator.find_at_most(k).unwrap();
            assert_eq!(some.as_slice(), &all[..k.min(all.len())]);
        }
    }

    #[test]
    fn queries_are_idempotent() {
        let mut rng = StdRng::seed_from_u64(42);
        let targets = scattered(&mut rng, 6, 90.0, 2.0);
        for traversal in [Traversal::Recursive, Traversal::Worklist] {
            let config = SearchConfig::default().with_traversal(traversal);
            let set = PointSet::from_iter(targets.iter().copied());
            let locator = Locator::with_config(set, config);
            let first = locator.search(None).unwrap();
            let second = locator.search(None).unwrap();
            assert_eq!(first, second, "{traversal:?}");
        }
    }
}
