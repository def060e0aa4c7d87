// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by configuration, region validation, and searches.

use thiserror::Error;

use crate::types::{Coordinate, Region};

/// Failures reported by a [`Locator`][crate::Locator] query or by configuration constructors.
///
/// Regions discarded deep inside a search never surface here; only malformed
/// input at the entry points and oracle/cancellation outcomes do.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LocateError {
    /// Domain bounds are non-finite or inverted.
    #[error("invalid search domain: {reason}")]
    InvalidDomain {
        /// Which bound check failed.
        reason: &'static str,
    },
    /// Precision is non-finite or not strictly positive.
    #[error("precision must be finite and strictly positive, got {0}")]
    InvalidPrecision(f64),
    /// Precision is finer than the domain bounds can resolve.
    #[error("precision {precision} is below the resolution of the domain bounds (minimum {min})")]
    PrecisionTooFine {
        /// The requested precision.
        precision: f64,
        /// [`Domain::min_precision`][crate::Domain::min_precision] of the domain.
        min: f64,
    },
    /// A caller-supplied region is empty, non-finite, or outside the domain.
    #[error("region {region:?} is empty or lies outside the search domain")]
    InvalidRegion {
        /// The rejected region.
        region: Region,
    },
    /// Quadrisection was requested for a region that is not square.
    #[error("quadrisection needs a square region, got {lat_size} x {lon_size}")]
    NotSquare {
        /// Extent along the latitude axis.
        lat_size: f64,
        /// Extent along the longitude axis.
        lon_size: f64,
    },
    /// The oracle could not answer a covering-disc probe.
    #[error("oracle could not answer for disc at {center:?} with radius {radius}")]
    Indeterminate {
        /// Center of the unanswered probe.
        center: Coordinate,
        /// Radius of the unanswered probe.
        radius: f64,
    },
    /// An exhaustive scan would need more than `u32::MAX` cells along an axis.
    #[error("exhaustive scan needs {rows} x {cols} cells")]
    ScanTooLarge {
        /// Cells along the latitude axis.
        rows: f64,
        /// Cells along the longitude axis.
        cols: f64,
    },
    /// The search observed its cancellation flag.
    #[error("search cancelled after {found} hit(s)")]
    Cancelled {
        /// Hits accepted before cancellation was observed.
        found: usize,
    },
}
