// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oracle trait answering existence-within-radius probes.

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::types::Coordinate;

/// Answer to a single covering-disc probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    /// At least one target lies within the disc.
    Present,
    /// No target lies within the disc.
    Absent,
    /// The oracle could not decide; the search fails with
    /// [`LocateError::Indeterminate`][crate::LocateError::Indeterminate].
    Indeterminate,
}

impl Probe {
    /// Whether the probe reported a target.
    #[inline]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

impl From<bool> for Probe {
    #[inline]
    fn from(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }
}

/// Existence oracle used by [`Locator`][crate::Locator] to prune regions.
///
/// Implementations must answer [`Probe::Present`] exactly when some target
/// lies at Euclidean distance `<= radius` from `center`. Answers must be a
/// pure function of the arguments and the current target set. The searcher
/// only issues finite, non-negative radii.
pub trait Oracle {
    /// Probe the closed disc of `radius` around `center`.
    fn exists(&self, center: Coordinate, radius: f64) -> Probe;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    #[inline]
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        (**self).exists(center, radius)
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    #[inline]
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        (**self).exists(center, radius)
    }
}

impl<O: Oracle + ?Sized> Oracle for Arc<O> {
    #[inline]
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        (**self).exists(center, radius)
    }
}
