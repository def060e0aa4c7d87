// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Search configuration: domain, precision, and traversal strategy.

use crate::error::LocateError;
use crate::types::{Domain, Region};

/// How a region is subdivided once its covering disc reports a target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Split {
    /// Quarter square regions; terminate once the side is `<= precision`.
    #[default]
    Quadrisect,
    /// Halve the longer axis of a rectangle; terminate once both extents
    /// are `<= precision`. Elongated domains prune faster this way.
    Bisect,
}

/// Order in which subdivided regions are visited.
///
/// Both traversals visit regions in the same depth-first order and produce
/// identical results. See [`Locator::par_search`][crate::Locator] (feature
/// `parallel`) for a multi-threaded traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Recursive descent on the call stack.
    #[default]
    Recursive,
    /// Explicit heap-allocated stack; depth is not bounded by the call stack.
    Worklist,
}

/// Parameters of a [`Locator`][crate::Locator].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Universe the search may explore.
    pub domain: Domain,
    /// Region size at which subdivision stops and the center is reported.
    pub precision: f64,
    /// Subdivision strategy.
    pub split: Split,
    /// Visiting order implementation.
    pub traversal: Traversal,
    /// Drop terminal hits that duplicate an already reported target.
    ///
    /// A terminal cell's covering disc reaches into its neighbours, so one
    /// target may be reported by several adjacent cells. With merging on, a
    /// hit within twice the terminal covering radius `R` of an earlier hit is
    /// dropped. Every duplicate of a target then collapses into one hit, but
    /// distinct targets are only guaranteed to be kept apart when they are
    /// more than `4R` (about `2√2` cell sides) apart. Off by default.
    pub merge_duplicates: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            precision: Self::DEFAULT_PRECISION,
            split: Split::default(),
            traversal: Traversal::default(),
            merge_duplicates: false,
        }
    }
}

impl SearchConfig {
    /// Precision used by [`SearchConfig::default`].
    pub const DEFAULT_PRECISION: f64 = 1e-6;

    /// Create a validated configuration with default strategy settings.
    ///
    /// # Errors
    ///
    /// See [`SearchConfig::validate`].
    pub fn new(domain: Domain, precision: f64) -> Result<Self, LocateError> {
        let config = Self {
            domain,
            precision,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the domain.
    #[must_use]
    pub const fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Replace the precision.
    #[must_use]
    pub const fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Replace the subdivision strategy.
    #[must_use]
    pub const fn with_split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// Replace the traversal.
    #[must_use]
    pub const fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Enable or disable duplicate merging.
    #[must_use]
    pub const fn with_merge_duplicates(mut self, merge: bool) -> Self {
        self.merge_duplicates = merge;
        self
    }

    /// Check the domain and precision.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::InvalidDomain`], [`LocateError::InvalidPrecision`],
    /// or [`LocateError::PrecisionTooFine`] when the precision is below
    /// [`Domain::min_precision`].
    pub fn validate(&self) -> Result<(), LocateError> {
        self.domain.validate()?;
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(LocateError::InvalidPrecision(self.precision));
        }
        let min = self.domain.min_precision();
        if self.precision < min {
            return Err(LocateError::PrecisionTooFine {
                precision: self.precision,
                min,
            });
        }
        Ok(())
    }

    /// Whether `region` is small enough to be reported as a hit.
    #[inline]
    pub(crate) fn is_terminal(&self, region: &Region) -> bool {
        match self.split {
            Split::Quadrisect => region.lat_size <= self.precision,
            Split::Bisect => {
                region.lat_size <= self.precision && region.lon_size <= self.precision
            }
        }
    }
}
