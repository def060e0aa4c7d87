// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closure adapter.

use core::fmt::Debug;

use crate::oracle::{Oracle, Probe};
use crate::types::Coordinate;

/// Oracle backed by a closure `Fn(Coordinate, f64) -> bool`.
///
/// Created with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnOracle<F>(F);

impl<F> Debug for FnOracle<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnOracle").finish_non_exhaustive()
    }
}

/// Wrap a predicate as an [`Oracle`].
///
/// ```rust
/// use understory_locate::{Coordinate, Locator};
/// use understory_locate::oracles::from_fn;
///
/// let target = Coordinate::new(12.0, -7.5);
/// let oracle = from_fn(move |center: Coordinate, radius| center.distance(target) <= radius);
/// let hits = Locator::new(oracle).find_at_most(1).unwrap();
/// assert!(hits[0].distance(target) <= 1e-6);
/// ```
pub fn from_fn<F>(f: F) -> FnOracle<F>
where
    F: Fn(Coordinate, f64) -> bool,
{
    FnOracle(f)
}

impl<F> Oracle for FnOracle<F>
where
    F: Fn(Coordinate, f64) -> bool,
{
    #[inline]
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        (self.0)(center, radius).into()
    }
}
