// Copyright (c) 2025-2026 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The polygon module accumulates the perimeter and area of a geodesic
//! polygon, or the length of a geodesic polyline.
//!
//! Vertices are added one at a time, each edge resolved with the inverse
//! problem solver; edges may also be added directly from an azimuth and
//! distance, resolved with a [`GeodesicLine`]. The area is accumulated as
//! the sum of the signed areas between each edge and the Equator, with a
//! count of prime meridian transits so that the sum remains consistent when
//! the polygon encircles a pole or the edges wrap in longitude.

use crate::geodesic;
use crate::{Caps, Ellipsoid, GeodesicLine, Metres};
use angle_sc::{Angle, Degrees, Radians};
use unit_sphere::{great_circle, LatLong};

/// Error-free transformation of a sum: returns the rounded sum and the
/// round-off error, so that `sum + error` equals `u + v` exactly.
#[must_use]
fn two_sum(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let up = up - u;
    let vpp = vpp - v;
    (s, -(up + vpp))
}

/// A compensated floating point accumulator.
///
/// It carries the round-off error of the running sum in a correction term,
/// so that long sequences of additions lose no precision.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Accumulator {
    sum: f64,
    correction: f64,
}

impl Accumulator {
    /// Add a value to the accumulator.
    fn add(&mut self, value: f64) {
        let (value, error) = two_sum(value, self.correction);
        let (sum, correction) = two_sum(value, self.sum);
        self.sum = sum;
        self.correction = correction;
        if self.sum == 0.0 {
            self.sum = error;
        } else {
            self.correction += error;
        }
    }

    /// The value of the accumulator.
    #[must_use]
    fn total(&self) -> f64 {
        self.sum + self.correction
    }
}

/// Count the transit of the prime meridian by the edge from `lon1` to
/// `lon2`: 1 for an Eastward crossing, -1 for a Westward crossing.
#[must_use]
fn transit(lon1: Degrees, lon2: Degrees) -> i32 {
    let lon12 = (lon2 - lon1).0;
    if (lon1.0 <= 0.0) && (lon2.0 > 0.0) && (lon12 > 0.0) {
        1
    } else if (lon2.0 <= 0.0) && (lon1.0 > 0.0) && (lon12 < 0.0) {
        -1
    } else {
        0
    }
}

/// Count the transit of the prime meridian by the edge from `lon1` to an
/// unrolled longitude `lon2`.
#[must_use]
fn transit_direct(lon1: f64, lon2: f64) -> i32 {
    let lon1 = libm::remainder(lon1, 720.0);
    let lon2 = libm::remainder(lon2, 720.0);
    i32::from((-360.0 < lon2) && (lon2 <= 0.0)) - i32::from((-360.0 < lon1) && (lon1 <= 0.0))
}

/// An accumulator for the perimeter and area of a geodesic polygon, or the
/// length of a geodesic polyline.
///
/// Vertices are accumulated with [`add_point`](PolygonAccumulator::add_point)
/// and [`add_edge`](PolygonAccumulator::add_edge);
/// [`compute`](PolygonAccumulator::compute) closes the polygon virtually,
/// without mutating the accumulated state, so more vertices may be added
/// afterwards. [`test_point`](PolygonAccumulator::test_point) and
/// [`test_edge`](PolygonAccumulator::test_edge) evaluate a hypothetical
/// extra vertex or edge on a value copy of the running sums.
///
/// The accumulator is a single mutable value: concurrent mutation must be
/// serialised by the caller.
///
/// # Examples
/// ```
/// use ellipsoid_geodesic::*;
/// use ellipsoid_geodesic::polygon::PolygonAccumulator;
/// use angle_sc::is_within_tolerance;
///
/// // a quadrilateral in the South Atlantic
/// let mut accumulator = PolygonAccumulator::new(&WGS84_ELLIPSOID, false);
/// accumulator.add_point(&LatLong::new(Degrees(-30.0), Degrees(0.0)));
/// accumulator.add_point(&LatLong::new(Degrees(-30.0), Degrees(10.0)));
/// accumulator.add_point(&LatLong::new(Degrees(-20.0), Degrees(10.0)));
/// accumulator.add_point(&LatLong::new(Degrees(-20.0), Degrees(0.0)));
///
/// let (count, perimeter, area) = accumulator.compute(false, true);
/// assert_eq!(4, count);
/// // roughly 10 x 10 degrees, just over a million square kilometres
/// assert!(perimeter.0 > 4_000_000.0);
/// assert!(is_within_tolerance(1.12e12, area.unwrap(), 5.0e9));
/// ```
#[derive(Clone, Debug)]
pub struct PolygonAccumulator<'a> {
    /// A reference to the underlying `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
    /// Whether to accumulate a polyline (length only) or a polygon.
    polyline: bool,
    /// The number of vertices accumulated.
    count: usize,
    /// The number of prime meridian transits by the accumulated edges.
    crossings: i32,
    /// The accumulated perimeter (or polyline length) in metres.
    perimeter_sum: Accumulator,
    /// The accumulated signed area in square metres.
    area_sum: Accumulator,
    /// The first vertex.
    first: LatLong,
    /// The latest vertex.
    latest: LatLong,
}

impl<'a> PolygonAccumulator<'a> {
    /// Construct an empty `PolygonAccumulator`.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    /// * `polyline` - accumulate an open polyline (length only) instead of
    ///   a closed polygon.
    #[must_use]
    pub fn new(ellipsoid: &'a Ellipsoid, polyline: bool) -> Self {
        Self {
            ellipsoid,
            polyline,
            count: 0,
            crossings: 0,
            perimeter_sum: Accumulator::default(),
            area_sum: Accumulator::default(),
            first: LatLong::new(Degrees(0.0), Degrees(0.0)),
            latest: LatLong::new(Degrees(0.0), Degrees(0.0)),
        }
    }

    /// The number of vertices accumulated.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether the accumulator is accumulating a polyline.
    #[must_use]
    pub const fn is_polyline(&self) -> bool {
        self.polyline
    }

    /// Accessor for the reference to the underlying `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// Reset the accumulator to its empty state.
    pub fn clear(&mut self) {
        self.count = 0;
        self.crossings = 0;
        self.perimeter_sum = Accumulator::default();
        self.area_sum = Accumulator::default();
        self.first = LatLong::new(Degrees(0.0), Degrees(0.0));
        self.latest = LatLong::new(Degrees(0.0), Degrees(0.0));
    }

    /// Add a vertex to the polygon or polyline.
    ///
    /// The edge from the previous vertex (if any) is resolved with the
    /// inverse problem solver.
    /// * `point` - the vertex in geodetic coordinates.
    pub fn add_point(&mut self, point: &LatLong) {
        if self.count == 0 {
            self.first = LatLong::new(point.lat(), point.lon());
        } else {
            let caps = if self.polyline { Caps::NONE } else { Caps::AREA };
            let values = geodesic::calculate_inverse_values(
                &self.latest,
                point,
                caps,
                Radians(great_circle::MIN_VALUE),
                self.ellipsoid,
            );
            self.perimeter_sum.add(values.distance.0);
            if !self.polyline {
                self.area_sum.add(values.area.unwrap_or(0.0));
                self.crossings += transit(self.latest.lon(), point.lon());
            }
        }
        self.latest = LatLong::new(point.lat(), point.lon());
        self.count += 1;
    }

    /// Add an edge to the polygon or polyline: the direct problem dual of
    /// [`add_point`](PolygonAccumulator::add_point).
    ///
    /// The new vertex is resolved with the direct problem solver from the
    /// latest vertex. Ignored if no vertex has been added yet, since an
    /// edge requires a start point.
    /// * `azimuth` - the azimuth of the edge at the latest vertex.
    /// * `distance` - the length of the edge in metres.
    pub fn add_edge(&mut self, azimuth: Angle, distance: Metres) {
        if self.count == 0 {
            return;
        }

        let caps = if self.polyline {
            Caps::STANDARD | Caps::LONG_UNROLL
        } else {
            Caps::STANDARD | Caps::LONG_UNROLL | Caps::AREA
        };
        let line = GeodesicLine::from_lat_lon_azi(&self.latest, azimuth, caps, self.ellipsoid);
        let position = line.position(distance);

        let latitude = position.latitude.map_or(0.0, |value| value.0);
        let unrolled_longitude = position.longitude.map_or(0.0, |value| value.0);

        self.perimeter_sum.add(distance.0);
        if !self.polyline {
            self.area_sum.add(position.area.unwrap_or(0.0));
            self.crossings += transit_direct(self.latest.lon().0, unrolled_longitude);
        }

        // store the new vertex with its longitude normalised
        let longitude = Degrees::from(Angle::from(Degrees(unrolled_longitude)));
        self.latest = LatLong::new(Degrees(latitude), longitude);
        self.count += 1;
    }

    /// Calculate the perimeter and area of the polygon accumulated so far,
    /// virtually closed by an edge from the latest vertex back to the first.
    ///
    /// A non-destructive read: the accumulated state is unchanged and more
    /// vertices may be added afterwards.
    /// * `reverse` - count clockwise traversal as positive instead of
    ///   counter-clockwise.
    /// * `sign` - return the signed area, in the range +/- half the area of
    ///   the ellipsoid; otherwise return the area of the region actually
    ///   enclosed, in the range zero to the area of the ellipsoid.
    ///
    /// returns the vertex count, the perimeter (the length for a polyline)
    /// in metres and the area in square metres, `None` for a polyline.
    #[must_use]
    pub fn compute(&self, reverse: bool, sign: bool) -> (usize, Metres, Option<f64>) {
        if self.count < 2 {
            let area = if self.polyline { None } else { Some(0.0) };
            return (self.count, Metres(0.0), area);
        }

        if self.polyline {
            return (self.count, Metres(self.perimeter_sum.total()), None);
        }

        // close the polygon with the edge back to the first vertex
        let values = geodesic::calculate_inverse_values(
            &self.latest,
            &self.first,
            Caps::AREA,
            Radians(great_circle::MIN_VALUE),
            self.ellipsoid,
        );
        let perimeter = self.perimeter_sum.total() + values.distance.0;

        let mut area_sum = self.area_sum;
        area_sum.add(values.area.unwrap_or(0.0));
        let crossings = self.crossings + transit(self.latest.lon(), self.first.lon());

        let area = self.reduce_area(area_sum.total(), crossings, reverse, sign);
        (self.count, Metres(perimeter), Some(area))
    }

    /// Calculate what [`compute`](PolygonAccumulator::compute) would return
    /// with an extra vertex appended, without mutating the accumulator.
    /// * `point` - the hypothetical vertex in geodetic coordinates.
    /// * `reverse`, `sign` - as `compute`.
    #[must_use]
    pub fn test_point(
        &self,
        point: &LatLong,
        reverse: bool,
        sign: bool,
    ) -> (usize, Metres, Option<f64>) {
        let mut trial = self.clone();
        trial.add_point(point);
        trial.compute(reverse, sign)
    }

    /// Calculate what [`compute`](PolygonAccumulator::compute) would return
    /// with an extra edge appended, without mutating the accumulator.
    /// * `azimuth` - the azimuth of the hypothetical edge at the latest vertex.
    /// * `distance` - the length of the hypothetical edge in metres.
    /// * `reverse`, `sign` - as `compute`.
    #[must_use]
    pub fn test_edge(
        &self,
        azimuth: Angle,
        distance: Metres,
        reverse: bool,
        sign: bool,
    ) -> (usize, Metres, Option<f64>) {
        let mut trial = self.clone();
        trial.add_edge(azimuth, distance);
        trial.compute(reverse, sign)
    }

    /// Put the accumulated area into the requested range.
    ///
    /// The internal sum counts clockwise traversal as positive; an odd
    /// number of prime meridian transits means the polygon encircles a pole
    /// and the sum is off by half the area of the ellipsoid.
    #[must_use]
    fn reduce_area(&self, accumulated: f64, crossings: i32, reverse: bool, sign: bool) -> f64 {
        let area0 = self.ellipsoid.area();
        let mut area = accumulated;

        if (crossings & 1) != 0 {
            area += if area < 0.0 { area0 / 2.0 } else { -area0 / 2.0 };
        }

        // convert from the clockwise positive internal convention
        if !reverse {
            area = -area;
        }

        if sign {
            // signed result
            if area > area0 / 2.0 {
                area -= area0;
            } else if area <= -area0 / 2.0 {
                area += area0;
            }
        } else {
            // the area of the region actually enclosed
            if area >= area0 {
                area -= area0;
            } else if area < 0.0 {
                area += area0;
            }
        }

        area
    }
}

/// Calculate the perimeter and area of a geodesic polygon given parallel
/// slices of its vertex latitudes and longitudes, in degrees.
///
/// The area is signed: positive for counter-clockwise traversal of the
/// vertices.
/// * `latitudes`, `longitudes` - the vertex coordinates in degrees.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the polygon perimeter in metres and its area in square metres.
///
/// # Panics
///
/// The function will panic if `latitudes` and `longitudes` have different
/// lengths: the slices must hold one value each per vertex.
#[must_use]
pub fn calculate_polygon_perimeter_area(
    latitudes: &[f64],
    longitudes: &[f64],
    ellipsoid: &Ellipsoid,
) -> (Metres, f64) {
    assert!(
        latitudes.len() == longitudes.len(),
        "latitudes and longitudes must have equal lengths"
    );

    let mut accumulator = PolygonAccumulator::new(ellipsoid, false);
    for (latitude, longitude) in latitudes.iter().zip(longitudes.iter()) {
        accumulator.add_point(&LatLong::new(Degrees(*latitude), Degrees(*longitude)));
    }

    let (_, perimeter, area) = accumulator.compute(false, true);
    (perimeter, area.unwrap_or(0.0))
}
