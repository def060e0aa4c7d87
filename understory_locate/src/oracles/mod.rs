// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made [`Oracle`][crate::Oracle] implementations.
//!
//! - `PointSet`: in-memory target list, brute-force distance checks.
//! - `GridOracle` (feature `oracle_grid`): targets bucketed into a uniform grid;
//!   probes only touch cells overlapping the disc's bounding box.
//! - `CountingOracle`: wraps another oracle and counts probes.
//! - `CachingOracle`: memoizes repeated identical probes.
//! - `FnOracle`: adapts a closure `Fn(Coordinate, f64) -> bool`.

pub(crate) mod caching;
pub(crate) mod counting;
pub(crate) mod func;
#[cfg(feature = "oracle_grid")]
pub(crate) mod grid;
pub(crate) mod points;

pub use caching::CachingOracle;
pub use counting::CountingOracle;
pub use func::{FnOracle, from_fn};
#[cfg(feature = "oracle_grid")]
pub use grid::GridOracle;
pub use points::PointSet;
