// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinates, search regions, and domain bounds.

use core::f64::consts::SQRT_2;

use kurbo::{Circle, Point, Rect, Vec2};

use crate::error::LocateError;

/// Relative inflation of covering radii.
///
/// A target sitting exactly on a region corner is at distance `diagonal / 2`
/// from the center, and both the center and the oracle's distance carry
/// rounding error.
const COVER_SLACK: f64 = 8.0 * f64::EPSILON;

/// Absolute inflation of covering radii, per unit of center magnitude.
///
/// Rounding the center moves it by at most one ulp per axis.
const CENTER_SLACK: f64 = 4.0 * f64::EPSILON;

/// Smallest usable precision, in ulps of the largest domain bound.
///
/// At this floor the center slack is at most 1/8 of the precision.
const MIN_PRECISION_ULPS: f64 = 64.0;

/// Tolerance, relative to the domain extent, for containment checks.
const EDGE_SLACK: f64 = 4.0 * f64::EPSILON;

/// A location in the 2D search domain.
///
/// `lat` maps to `x` and `lon` maps to `y` when converting to and from [`kurbo::Point`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Coordinate {
    /// Position along the latitude axis.
    pub lat: f64,
    /// Position along the longitude axis.
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate.
    #[inline(always)]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Euclidean distance to another coordinate.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        Point::from(self).distance(other.into())
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<Point> for Coordinate {
    #[inline]
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Coordinate> for Point {
    #[inline]
    fn from(c: Coordinate) -> Self {
        Self::new(c.lat, c.lon)
    }
}

/// Axis-aligned search region: an origin (minimum corner) plus extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Minimum corner.
    pub origin: Coordinate,
    /// Extent along the latitude axis.
    pub lat_size: f64,
    /// Extent along the longitude axis.
    pub lon_size: f64,
}

impl Region {
    /// Create a region from its minimum corner and extents.
    #[inline(always)]
    pub const fn new(origin: Coordinate, lat_size: f64, lon_size: f64) -> Self {
        Self {
            origin,
            lat_size,
            lon_size,
        }
    }

    /// Create a square region with side `size`.
    #[inline(always)]
    pub const fn square(origin: Coordinate, size: f64) -> Self {
        Self::new(origin, size, size)
    }

    /// Whether both extents are equal.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.lat_size == self.lon_size
    }

    /// Return true if either extent is zero, negative, or NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.lat_size > 0.0 && self.lon_size > 0.0)
    }

    /// Whether the origin and both extents are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.lat_size.is_finite() && self.lon_size.is_finite()
    }

    /// Center of the region.
    #[inline]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            self.origin.lat + self.lat_size / 2.0,
            self.origin.lon + self.lon_size / 2.0,
        )
    }

    /// Length of the diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        Vec2::new(self.lat_size, self.lon_size).hypot()
    }

    /// Radius of the disc around [`center`][Self::center] that covers the whole region.
    ///
    /// This is half the diagonal (`√2 · size / 2` for squares), rounded up by a
    /// few ulps of the radius and of the center's magnitude.
    #[inline]
    pub fn covering_radius(&self) -> f64 {
        let half_diagonal = if self.is_square() {
            SQRT_2 * self.lat_size / 2.0
        } else {
            self.diagonal() / 2.0
        };
        let c = self.center();
        let magnitude = c.lat.max(-c.lat) + c.lon.max(-c.lon);
        half_diagonal * (1.0 + COVER_SLACK) + magnitude * CENTER_SLACK
    }

    /// The covering disc as a kurbo circle.
    #[inline]
    pub fn covering_circle(&self) -> Circle {
        Circle::new(Point::from(self.center()), self.covering_radius())
    }

    /// The region as a kurbo rectangle (`lat` on `x`, `lon` on `y`).
    #[inline]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.origin.lat,
            self.origin.lon,
            self.origin.lat + self.lat_size,
            self.origin.lon + self.lon_size,
        )
    }

    /// Whether the region contains the coordinate, edges included.
    #[inline]
    pub fn contains(&self, c: Coordinate) -> bool {
        self.origin.lat <= c.lat
            && self.origin.lon <= c.lon
            && c.lat <= self.origin.lat + self.lat_size
            && c.lon <= self.origin.lon + self.lon_size
    }

    /// Split into four equal quadrants.
    ///
    /// Order: bottom-left, top-left, bottom-right, top-right, where "top"
    /// means larger `lat` and "right" means larger `lon`.
    pub fn quadrants(&self) -> [Self; 4] {
        let h_lat = self.lat_size / 2.0;
        let h_lon = self.lon_size / 2.0;
        let Coordinate { lat, lon } = self.origin;
        [
            Self::new(Coordinate::new(lat, lon), h_lat, h_lon),
            Self::new(Coordinate::new(lat + h_lat, lon), h_lat, h_lon),
            Self::new(Coordinate::new(lat, lon + h_lon), h_lat, h_lon),
            Self::new(Coordinate::new(lat + h_lat, lon + h_lon), h_lat, h_lon),
        ]
    }

    /// Bisect along the longer axis, lower half first.
    ///
    /// Latitude is split only when strictly longer; ties split longitude.
    pub fn halves(&self) -> [Self; 2] {
        let Coordinate { lat, lon } = self.origin;
        if self.lat_size > self.lon_size {
            let h = self.lat_size / 2.0;
            [
                Self::new(Coordinate::new(lat, lon), h, self.lon_size),
                Self::new(Coordinate::new(lat + h, lon), h, self.lon_size),
            ]
        } else {
            let h = self.lon_size / 2.0;
            [
                Self::new(Coordinate::new(lat, lon), self.lat_size, h),
                Self::new(Coordinate::new(lat, lon + h), self.lat_size, h),
            ]
        }
    }
}

/// Bounds of the universe a search may explore.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Domain {
    /// Minimum latitude.
    pub lat_min: f64,
    /// Minimum longitude.
    pub lon_min: f64,
    /// Maximum latitude.
    pub lat_max: f64,
    /// Maximum longitude.
    pub lon_max: f64,
}

impl Default for Domain {
    /// `[-180, 180] x [-180, 180]`.
    fn default() -> Self {
        Self {
            lat_min: -180.0,
            lon_min: -180.0,
            lat_max: 180.0,
            lon_max: 180.0,
        }
    }
}

impl Domain {
    /// Create a validated domain from min/max corners.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::InvalidDomain`] if any bound is non-finite or a
    /// minimum is not strictly below its maximum.
    pub fn new(
        lat_min: f64,
        lon_min: f64,
        lat_max: f64,
        lon_max: f64,
    ) -> Result<Self, LocateError> {
        let domain = Self {
            lat_min,
            lon_min,
            lat_max,
            lon_max,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Check bound ordering and finiteness.
    ///
    /// # Errors
    ///
    /// See [`Domain::new`].
    pub fn validate(&self) -> Result<(), LocateError> {
        let finite = self.lat_min.is_finite()
            && self.lon_min.is_finite()
            && self.lat_max.is_finite()
            && self.lon_max.is_finite();
        if !finite {
            return Err(LocateError::InvalidDomain {
                reason: "bounds must be finite",
            });
        }
        if self.lat_min >= self.lat_max {
            return Err(LocateError::InvalidDomain {
                reason: "lat_min must be below lat_max",
            });
        }
        if self.lon_min >= self.lon_max {
            return Err(LocateError::InvalidDomain {
                reason: "lon_min must be below lon_max",
            });
        }
        Ok(())
    }

    /// Width along the latitude axis.
    #[inline]
    pub fn lat_extent(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Height along the longitude axis.
    #[inline]
    pub fn lon_extent(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Whether both extents are equal.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.lat_extent() == self.lon_extent()
    }

    /// The whole domain as a region.
    #[inline]
    pub fn bounds(&self) -> Region {
        Region::new(
            Coordinate::new(self.lat_min, self.lon_min),
            self.lat_extent(),
            self.lon_extent(),
        )
    }

    /// Square anchored at the minimum corner with side `max(lat_extent, lon_extent)`.
    #[inline]
    pub fn enclosing_square(&self) -> Region {
        Region::square(
            Coordinate::new(self.lat_min, self.lon_min),
            self.lat_extent().max(self.lon_extent()),
        )
    }

    /// Largest absolute value among the four bounds.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        [self.lat_min, self.lon_min, self.lat_max, self.lon_max]
            .into_iter()
            .fold(0.0, |m, b| m.max(b).max(-b))
    }

    /// Finest precision a search over this domain accepts.
    ///
    /// Below this, cell centers and covering radii are dominated by rounding.
    #[inline]
    pub fn min_precision(&self) -> f64 {
        MIN_PRECISION_ULPS * f64::EPSILON * self.magnitude()
    }

    /// Whether the coordinate lies inside the bounds, edges included.
    #[inline]
    pub fn contains_point(&self, c: Coordinate) -> bool {
        self.bounds().contains(c)
    }

    /// Whether the region lies inside the bounds.
    ///
    /// Edges may overshoot by a few ulps of the domain extent, which absorbs
    /// rounding in repeatedly halved origins.
    pub fn contains(&self, region: &Region) -> bool {
        let slack = EDGE_SLACK * self.lat_extent().max(self.lon_extent());
        region.origin.lat >= self.lat_min - slack
            && region.origin.lon >= self.lon_min - slack
            && region.origin.lat + region.lat_size <= self.lat_max + slack
            && region.origin.lon + region.lon_size <= self.lon_max + slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_order_is_bl_tl_br_tr() {
        let r = Region::square(Coordinate::new(0.0, 0.0), 8.0);
        let q = r.quadrants();
        assert_eq!(q[0].origin, Coordinate::new(0.0, 0.0));
        assert_eq!(q[1].origin, Coordinate::new(4.0, 0.0));
        assert_eq!(q[2].origin, Coordinate::new(0.0, 4.0));
        assert_eq!(q[3].origin, Coordinate::new(4.0, 4.0));
        assert!(q.iter().all(|c| c.lat_size == 4.0 && c.lon_size == 4.0));
    }

    #[test]
    fn halves_split_longer_axis() {
        let tall = Region::new(Coordinate::new(-180.0, 0.0), 360.0, 10.0);
        let [a, b] = tall.halves();
        assert_eq!(a, Region::new(Coordinate::new(-180.0, 0.0), 180.0, 10.0));
        assert_eq!(b, Region::new(Coordinate::new(0.0, 0.0), 180.0, 10.0));

        // Ties split longitude.
        let sq = Region::square(Coordinate::new(0.0, 0.0), 2.0);
        let [a, b] = sq.halves();
        assert_eq!(a, Region::new(Coordinate::new(0.0, 0.0), 2.0, 1.0));
        assert_eq!(b, Region::new(Coordinate::new(0.0, 1.0), 2.0, 1.0));
    }

    #[test]
    fn covering_radius_reaches_every_corner() {
        let regions = [
            Region::square(Coordinate::new(-180.0, -180.0), 360.0),
            Region::square(Coordinate::new(0.1, 0.7), 3.0e-7),
            Region::new(Coordinate::new(2.0, -3.0), 5.625, 10.0),
        ];
        for r in regions {
            let c = r.center();
            let radius = r.covering_radius();
            let rect = r.to_rect();
            for corner in [
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x0, rect.y1),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
            ] {
                assert!(
                    c.distance(corner.into()) <= radius,
                    "corner {corner:?} escapes covering disc of {r:?}"
                );
            }
        }
    }

    #[test]
    fn empty_regions() {
        let o = Coordinate::new(0.0, 0.0);
        assert!(Region::square(o, 0.0).is_empty());
        assert!(Region::square(o, -1.0).is_empty());
        assert!(Region::new(o, 1.0, f64::NAN).is_empty());
        assert!(!Region::square(o, 1e-9).is_empty());
    }

    #[test]
    fn domain_validation_and_containment() {
        assert!(Domain::new(0.0, 0.0, 1.0, 1.0).is_ok());
        assert!(matches!(
            Domain::new(1.0, 0.0, 0.0, 1.0),
            Err(LocateError::InvalidDomain { .. })
        ));
        assert!(matches!(
            Domain::new(0.0, 0.0, f64::INFINITY, 1.0),
            Err(LocateError::InvalidDomain { .. })
        ));

        let d = Domain::default();
        assert!(d.contains(&d.bounds()));
        assert!(d.contains(&Region::square(Coordinate::new(0.0, 0.0), 180.0)));
        assert!(!d.contains(&Region::square(Coordinate::new(0.0, 0.0), 181.0)));
        assert!(!d.contains(&Region::square(Coordinate::new(-181.0, 0.0), 1.0)));

        let wide = Domain::new(-180.0, 0.0, 180.0, 10.0).unwrap();
        assert!(!wide.is_square());
        assert_eq!(wide.enclosing_square().lat_size, 360.0);
        assert!(!wide.contains(&wide.enclosing_square()));
    }

    #[test]
    fn center_slack_stays_below_precision_floor() {
        let d = Domain::default();
        assert_eq!(d.magnitude(), 180.0);
        let floor = d.min_precision();
        // A terminal cell at the floor, as far from the origin as possible.
        let cell = Region::square(Coordinate::new(180.0 - floor, 180.0 - floor), floor);
        let half_diagonal = SQRT_2 * floor / 2.0;
        assert!(cell.covering_radius() >= half_diagonal);
        assert!(cell.covering_radius() - half_diagonal <= floor / 4.0);
        assert!(cell.covering_radius() <= floor);

        let unit = Domain::new(0.0, -0.5, 1.0, 0.25).unwrap();
        assert_eq!(unit.magnitude(), 1.0);
    }

    #[test]
    fn kurbo_conversions() {
        let c = Coordinate::new(1.5, -2.0);
        let p: Point = c.into();
        assert_eq!(p, Point::new(1.5, -2.0));
        assert_eq!(Coordinate::from(p), c);

        let r = Region::new(c, 2.0, 4.0);
        assert_eq!(r.to_rect(), Rect::new(1.5, -2.0, 3.5, 2.0));
        assert_eq!(r.covering_circle().center, Point::new(2.5, 0.0));
    }
}
