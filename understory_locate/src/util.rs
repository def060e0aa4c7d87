// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Map a coordinate to a grid index along one axis, rounding towards -∞ and
/// saturating to the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn cell_coord(value: f64, origin: f64, cell_size: f64) -> i32 {
    let t = (value - origin) / cell_size;
    let coord = t as i32;

    // The cast truncates towards zero.
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}
