// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brute-force oracle over an in-memory target list.

use alloc::vec::Vec;

use crate::oracle::{Oracle, Probe};
use crate::types::Coordinate;

/// Target list answering probes with a linear distance scan.
///
/// The set may be mutated between searches; a search sees whatever targets
/// are present while it runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    targets: Vec<Coordinate>,
}

impl PointSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Add a target.
    pub fn push(&mut self, target: Coordinate) {
        self.targets.push(target);
    }

    /// Remove every target equal to `target`. Returns how many were removed.
    pub fn remove(&mut self, target: Coordinate) -> usize {
        let before = self.targets.len();
        self.targets.retain(|t| *t != target);
        before - self.targets.len()
    }

    /// Remove all targets.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the set has no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The targets in insertion order.
    pub fn targets(&self) -> &[Coordinate] {
        &self.targets
    }
}

impl FromIterator<Coordinate> for PointSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl Extend<Coordinate> for PointSet {
    fn extend<I: IntoIterator<Item = Coordinate>>(&mut self, iter: I) {
        self.targets.extend(iter);
    }
}

impl Oracle for PointSet {
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        self.targets
            .iter()
            .any(|t| t.distance(center) <= radius)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> PointSet {
        PointSet::from_iter([
            Coordinate::new(0.0, 0.0),
            Coordinate::new(100.0, 50.0),
            Coordinate::new(-50.0, -30.0),
            Coordinate::new(75.0, 75.0),
            Coordinate::new(-100.0, 100.0),
        ])
    }

    #[test]
    fn answers_disc_membership() {
        let set = fleet();
        assert_eq!(set.exists(Coordinate::new(0.0, 0.0), 10.0), Probe::Present);
        assert_eq!(set.exists(Coordinate::new(0.0, 0.0), 5.0), Probe::Present);
        assert_eq!(set.exists(Coordinate::new(100.0, 50.0), 100.0), Probe::Present);
        assert_eq!(set.exists(Coordinate::new(20.0, 20.0), 5.0), Probe::Absent);
    }

    #[test]
    fn boundary_is_inclusive() {
        let set = PointSet::from_iter([Coordinate::new(3.0, 4.0)]);
        assert!(set.exists(Coordinate::new(0.0, 0.0), 5.0).is_present());
        assert!(!set.exists(Coordinate::new(0.0, 0.0), 4.999).is_present());
    }

    #[test]
    fn mutation_between_probes() {
        let mut set = fleet();
        assert_eq!(set.remove(Coordinate::new(0.0, 0.0)), 1);
        assert_eq!(set.exists(Coordinate::new(0.0, 0.0), 5.0), Probe::Absent);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.exists(Coordinate::new(0.0, 0.0), 1e9), Probe::Absent);
        set.extend([Coordinate::new(1.0, 1.0)]);
        assert_eq!(set.len(), 1);
    }
}
