// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid oracle for point targets.
//!
//! Targets are bucketed into fixed-size grid cells. A probe touches only the
//! cells overlapping the bounding box of its disc, or walks the occupied cells
//! directly when the disc spans more cells than are occupied. This suits
//! large, sparse target sets probed with discs that shrink as the search
//! descends.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use kurbo::{Circle, Point, Shape};
use smallvec::SmallVec;

use crate::oracle::{Oracle, Probe};
use crate::types::Coordinate;
use crate::util::cell_coord;

/// Grid-bucketed target set.
pub struct GridOracle {
    cell_size: f64,
    origin: Coordinate,
    cells: HashMap<(i32, i32), Cell>,
    slots: Vec<Option<Coordinate>>,
    free_list: Vec<usize>,
}

#[derive(Default)]
struct Cell {
    slots: SmallVec<[usize; 8]>,
}

impl Debug for GridOracle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOracle")
            .field("cell_size", &self.cell_size)
            .field("origin", &self.origin)
            .field("targets", &self.len())
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl GridOracle {
    /// Create an empty grid with the given cell size and origin at (0, 0).
    pub fn new(cell_size: f64) -> Self {
        Self::with_origin(cell_size, Coordinate::default())
    }

    /// Create an empty grid with the given cell size and origin.
    pub fn with_origin(cell_size: f64, origin: Coordinate) -> Self {
        debug_assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "cell_size must be finite and strictly positive"
        );
        Self {
            cell_size,
            origin,
            cells: HashMap::new(),
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Build a grid holding every target in `targets`.
    pub fn from_targets(cell_size: f64, targets: impl IntoIterator<Item = Coordinate>) -> Self {
        let mut grid = Self::new(cell_size);
        for t in targets {
            let _ = grid.insert(t);
        }
        grid
    }

    /// Insert a target. Returns a slot handle for [`remove`][Self::remove].
    pub fn insert(&mut self, target: Coordinate) -> usize {
        let slot = if let Some(slot) = self.free_list.pop() {
            self.slots[slot] = Some(target);
            slot
        } else {
            self.slots.push(Some(target));
            self.slots.len() - 1
        };
        let key = self.cell_of(target);
        self.cells.entry(key).or_default().slots.push(slot);
        slot
    }

    /// Remove the target stored in `slot`, if any.
    pub fn remove(&mut self, slot: usize) -> Option<Coordinate> {
        let target = self.slots.get_mut(slot)?.take()?;
        let key = self.cell_of(target);
        if let Some(cell) = self.cells.get_mut(&key) {
            if let Some(pos) = cell.slots.iter().position(|&s| s == slot) {
                cell.slots.swap_remove(pos);
            }
            if cell.slots.is_empty() {
                self.cells.remove(&key);
            }
        }
        self.free_list.push(slot);
        Some(target)
    }

    /// Remove all targets.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.slots.clear();
        self.free_list.clear();
    }

    /// Number of live targets.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Whether no targets are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_of(&self, c: Coordinate) -> (i32, i32) {
        (
            cell_coord(c.lat, self.origin.lat, self.cell_size),
            cell_coord(c.lon, self.origin.lon, self.cell_size),
        )
    }

    fn cell_hit(&self, cell: &Cell, center: Coordinate, radius: f64) -> bool {
        cell.slots.iter().any(|&slot| {
            self.slots
                .get(slot)
                .copied()
                .flatten()
                .is_some_and(|t| t.distance(center) <= radius)
        })
    }
}

impl Oracle for GridOracle {
    fn exists(&self, center: Coordinate, radius: f64) -> Probe {
        let bbox = Circle::new(Point::from(center), radius).bounding_box();
        let (ix0, iy0) = self.cell_of(Coordinate::new(bbox.x0, bbox.y0));
        let (ix1, iy1) = self.cell_of(Coordinate::new(bbox.x1, bbox.y1));

        let span = (i64::from(ix1) - i64::from(ix0) + 1)
            .saturating_mul(i64::from(iy1) - i64::from(iy0) + 1);
        let occupied = i64::try_from(self.cells.len()).unwrap_or(i64::MAX);

        let hit = if span > occupied {
            self.cells.iter().any(|(&(ix, iy), cell)| {
                (ix0..=ix1).contains(&ix)
                    && (iy0..=iy1).contains(&iy)
                    && self.cell_hit(cell, center, radius)
            })
        } else {
            (ix0..=ix1).any(|ix| {
                (iy0..=iy1).any(|iy| {
                    self.cells
                        .get(&(ix, iy))
                        .is_some_and(|cell| self.cell_hit(cell, center, radius))
                })
            })
        };
        hit.into()
    }
}
