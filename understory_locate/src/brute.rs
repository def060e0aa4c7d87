// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exhaustive baseline: probe every precision-sized cell of the domain.
//!
//! This costs `(extent / precision)²` probes and exists as a reference for
//! tests and benchmarks; use [`Locator`][crate::Locator] for real queries.

use alloc::vec::Vec;

use crate::config::SearchConfig;
use crate::error::LocateError;
use crate::oracle::{Oracle, Probe};
use crate::search::{Hits, merge_radius};
use crate::types::{Coordinate, Region};

/// Scan the configured domain row by row in cells of side `precision`.
///
/// Cells on the far edges are clipped to the domain. Duplicate merging and
/// the `limit` cap behave as in [`Locator::search`][crate::Locator::search];
/// the split and traversal settings are ignored.
///
/// # Errors
///
/// Returns configuration errors from [`SearchConfig::validate`],
/// [`LocateError::ScanTooLarge`] when an axis has more than `u32::MAX` cells,
/// and [`LocateError::Indeterminate`] if the oracle cannot answer a probe.
pub fn brute_force_scan<O: Oracle + ?Sized>(
    oracle: &O,
    config: &SearchConfig,
    limit: Option<usize>,
) -> Result<Vec<Coordinate>, LocateError> {
    config.validate()?;
    let domain = &config.domain;
    let step = config.precision;
    let rows = domain.lat_extent() / step;
    let cols = domain.lon_extent() / step;
    let (Some(row_count), Some(col_count)) = (cell_count(rows), cell_count(cols)) else {
        return Err(LocateError::ScanTooLarge { rows, cols });
    };

    let mut hits = Hits::new(limit, config.merge_duplicates);
    let merge_radius = merge_radius(&Region::square(Coordinate::default(), step));
    for i in 0..row_count {
        let lat = domain.lat_min + f64::from(i) * step;
        if lat >= domain.lat_max {
            break;
        }
        let lat_size = step.min(domain.lat_max - lat);
        for j in 0..col_count {
            if hits.is_full() {
                return Ok(hits.into_vec());
            }
            let lon = domain.lon_min + f64::from(j) * step;
            if lon >= domain.lon_max {
                break;
            }
            let cell = Region::new(
                Coordinate::new(lat, lon),
                lat_size,
                step.min(domain.lon_max - lon),
            );
            let center = cell.center();
            let radius = cell.covering_radius();
            match oracle.exists(center, radius) {
                Probe::Present => {
                    let _ = hits.offer(center, merge_radius);
                }
                Probe::Absent => {}
                Probe::Indeterminate => {
                    return Err(LocateError::Indeterminate { center, radius });
                }
            }
        }
    }
    Ok(hits.into_vec())
}

/// `extent / step` rounded up, if it fits the `u32` loop counters.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is checked to lie within the u32 range first."
)]
fn cell_count(cells: f64) -> Option<u32> {
    if !(cells >= 0.0 && cells <= f64::from(u32::MAX)) {
        return None;
    }
    // The cast truncates; round up partial cells.
    let whole = cells as u32;
    if f64::from(whole) < cells {
        whole.checked_add(1)
    } else {
        Some(whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Locator;
    use crate::config::Split;
    use crate::oracles::{CountingOracle, PointSet};
    use crate::types::Domain;

    #[test]
    fn agrees_with_divide_and_conquer_on_coarse_grid() {
        let targets = [
            Coordinate::new(1.3, 2.7),
            Coordinate::new(-6.2, 4.4),
            Coordinate::new(7.9, -7.1),
        ];
        let domain = Domain::new(-8.0, -8.0, 8.0, 8.0).unwrap();
        let config = SearchConfig::new(domain, 0.25)
            .unwrap()
            .with_merge_duplicates(true);
        let set = PointSet::from_iter(targets);

        let brute = brute_force_scan(&set, &config, None).unwrap();
        let fast = Locator::with_config(&set, config).find_all().unwrap();
        assert_eq!(brute.len(), targets.len(), "brute: {brute:?}");
        assert_eq!(fast.len(), targets.len(), "fast: {fast:?}");
        for t in targets {
            assert!(brute.iter().any(|h| h.distance(t) <= 0.25));
            assert!(fast.iter().any(|h| h.distance(t) <= 0.25));
        }
    }

    #[test]
    fn probes_every_cell() {
        let domain = Domain::new(0.0, 0.0, 4.0, 2.0).unwrap();
        let config = SearchConfig::new(domain, 1.0)
            .unwrap()
            .with_split(Split::Bisect);
        let oracle = CountingOracle::new(PointSet::new());
        assert!(brute_force_scan(&oracle, &config, None).unwrap().is_empty());
        assert_eq!(oracle.calls(), 8);
    }

    #[test]
    fn stops_at_cap() {
        let config = SearchConfig::new(Domain::new(0.0, 0.0, 4.0, 4.0).unwrap(), 1.0).unwrap();
        let set = PointSet::from_iter([Coordinate::new(0.5, 0.5), Coordinate::new(3.5, 3.5)]);
        let oracle = CountingOracle::new(set);
        let hits = brute_force_scan(&oracle, &config, Some(1)).unwrap();
        assert_eq!(hits, [Coordinate::new(0.5, 0.5)]);
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn oversized_scan_is_rejected_before_probing() {
        // 360 / 5e-8 = 7.2e9 cells per axis, past the u32 counters.
        let config = SearchConfig::default().with_precision(5e-8);
        let oracle = CountingOracle::new(PointSet::new());
        assert!(matches!(
            brute_force_scan(&oracle, &config, None),
            Err(LocateError::ScanTooLarge { .. })
        ));
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn cell_counts_fit_u32() {
        assert_eq!(cell_count(4.0), Some(4));
        assert_eq!(cell_count(4.25), Some(5));
        assert_eq!(cell_count(f64::from(u32::MAX)), Some(u32::MAX));
        assert_eq!(cell_count(f64::from(u32::MAX) + 1.0), None);
        assert_eq!(cell_count(f64::NAN), None);
    }
}
