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

//! ellipsoid-geodesic
//!
//! A library for solving geodesic problems on an ellipsoid of revolution:
//!
//! - the *direct* problem: given a start position, azimuth and distance,
//!   find the end position and azimuth;
//! - the *inverse* problem: given two positions, find the azimuths and the
//!   length of the geodesic between them;
//! - repeated position queries along a single geodesic, via [`GeodesicLine`];
//! - the perimeter and area of geodesic polygons, via
//!   [`polygon::PolygonAccumulator`].
//!
//! ## Design
//!
//! The library is based on Charles Karney's
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf) and his
//! [GeographicLib](https://geographiclib.sourceforge.io/) library.
//!
//! Geodesic paths are modelled as great circle arcs on the auxiliary sphere,
//! with series expansions in the third flattening of the ellipsoid mapping
//! arc lengths and longitude differences between the sphere and the
//! ellipsoid. The series are evaluated to 6th order, which keeps truncation
//! error below double precision round-off for Earth-like flattenings.
//!
//! The [`Ellipsoid`] type holds an ellipsoid of revolution defined by its
//! Semimajor axis and flattening, together with the series coefficients
//! derived from them. The flattening may be zero (a sphere) or negative
//! (a prolate ellipsoid). The static `WGS84_ELLIPSOID` represents the
//! WGS-84 `Ellipsoid` which is used by the `GeodesicLine` `From` traits.
//!
//! A [`GeodesicLine`] captures a start position and azimuth (given directly,
//! or solved from a pair of positions) together with the series coefficients
//! selected by a set of capabilities, [`Caps`], so that repeated position
//! queries along the geodesic are cheap. Quantities whose capability was not
//! requested are reported as `None`, never calculated incorrectly.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`
//!   and perform great-circle calculations;
//! - [icao-units](https://crates.io/crates/icao-units) - to define `Metres` and
//!   `NauticalMiles` and perform conversions between them.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::suboptimal_flops)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod ellipsoid;
pub mod geodesic;
pub mod polygon;

pub use angle_sc::{Angle, Degrees, Radians, Validate};
pub use icao_units::non_si::NauticalMiles;
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

use angle_sc::trig;
use once_cell::sync::Lazy;
use unit_sphere::great_circle;

/// A set of capabilities: the quantities a [`GeodesicLine`] or an inverse
/// problem solution can calculate.
///
/// Each output capability carries the series expansions it requires, so a
/// `GeodesicLine` only evaluates the coefficient tables it needs.
/// Capabilities are combined with `|` and queried with [`Caps::contains`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caps(u32);

impl Caps {
    /// The C1 series: distance from arc length.
    const C1: Self = Self(1 << 0);
    /// The C1p series: arc length from distance.
    const C1P: Self = Self(1 << 1);
    /// The C2 series: reduced length and geodesic scales.
    const C2: Self = Self(1 << 2);
    /// The C3 series: longitude.
    const C3: Self = Self(1 << 3);
    /// The C4 series: area.
    const C4: Self = Self(1 << 4);

    /// No capabilities.
    pub const NONE: Self = Self(0);
    /// Calculate the latitude of positions.
    pub const LATITUDE: Self = Self(1 << 7);
    /// Calculate the longitude of positions.
    pub const LONGITUDE: Self = Self(1 << 8 | Self::C3.0);
    /// Calculate the azimuth at positions.
    pub const AZIMUTH: Self = Self(1 << 9);
    /// Calculate the distance to positions.
    pub const DISTANCE: Self = Self(1 << 10 | Self::C1.0);
    /// Accept distance (instead of arc length) as a position query input.
    pub const DISTANCE_IN: Self = Self(1 << 11 | Self::C1.0 | Self::C1P.0);
    /// Calculate the reduced length of the geodesic to positions.
    pub const REDUCED_LENGTH: Self = Self(1 << 12 | Self::C1.0 | Self::C2.0);
    /// Calculate the geodesic scales at positions.
    pub const GEODESIC_SCALE: Self = Self(1 << 13 | Self::C1.0 | Self::C2.0);
    /// Calculate the area between the geodesic and the Equator.
    pub const AREA: Self = Self(1 << 14 | Self::C4.0);
    /// Report longitudes unrolled: unbounded and monotonic along a line,
    /// instead of normalised to -180 to 180 degrees.
    pub const LONG_UNROLL: Self = Self(1 << 15);

    /// The default capabilities: positions, azimuths and distances.
    pub const STANDARD: Self = Self(
        Self::LATITUDE.0
            | Self::LONGITUDE.0
            | Self::AZIMUTH.0
            | Self::DISTANCE.0
            | Self::DISTANCE_IN.0,
    );
    /// All the output capabilities.
    pub const ALL: Self =
        Self(Self::STANDARD.0 | Self::REDUCED_LENGTH.0 | Self::GEODESIC_SCALE.0 | Self::AREA.0);

    /// Test whether this set contains all the capabilities in `caps`.
    #[must_use]
    pub const fn contains(self, caps: Self) -> bool {
        (self.0 & caps.0) == caps.0
    }
}

impl core::ops::BitOr for Caps {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitAnd for Caps {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The reciprocal of one minus the flattening ratio.
    recip_one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The third flattening of the ellipsoid.
    n: f64,
    /// The square of the authalic radius of the ellipsoid.
    sq_authalic_radius: f64,

    /// The A3 series `coefficients` of the ellipsoid.
    a3: [f64; 6],
    /// The C3x series `coefficients` of the ellipsoid.
    c3x: [f64; 15],
    /// The C4x series `coefficients` of the ellipsoid.
    c4x: [f64; 21],
}

impl Ellipsoid {
    /// Constructor.
    ///
    /// The values are accepted as given: a non-positive Semimajor axis or a
    /// flattening of one or more is a caller error, not validated here.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio. May be zero
    ///   (a sphere) or negative (a prolate ellipsoid).
    #[must_use]
    pub fn new(a: Metres, f: f64) -> Self {
        let one_minus_f = 1.0 - f;
        let b = ellipsoid::calculate_minor_axis(a, f);
        let e_2 = ellipsoid::calculate_sq_eccentricity(f);
        let n = ellipsoid::calculate_3rd_flattening(f);
        Self {
            a,
            f,
            b,
            one_minus_f,
            recip_one_minus_f: 1.0 / one_minus_f,
            e_2,
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            n,
            sq_authalic_radius: ellipsoid::calculate_sq_authalic_radius(a, b, e_2),
            a3: ellipsoid::coefficients::evaluate_coeffs_a3(n),
            c3x: ellipsoid::coefficients::evaluate_coeffs_c3x(n),
            c4x: ellipsoid::coefficients::evaluate_coeffs_c4x(n),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The reciprocal of one minus the flattening ratio.
    #[must_use]
    pub const fn recip_one_minus_f(&self) -> f64 {
        self.recip_one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The square of the authalic radius of the ellipsoid.
    #[must_use]
    pub const fn sq_authalic_radius(&self) -> f64 {
        self.sq_authalic_radius
    }

    /// The area of the ellipsoid in square metres.
    #[must_use]
    pub fn area(&self) -> f64 {
        4.0 * core::f64::consts::PI * self.sq_authalic_radius
    }

    /// The A3 series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn a3(&self) -> [f64; 6] {
        self.a3
    }

    /// The C3x series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn c3x(&self) -> [f64; 15] {
        self.c3x
    }

    /// The C4x series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn c4x(&self) -> [f64; 21] {
        self.c4x
    }

    /// Calculate epsilon, the variable used in series expansions.
    /// Note: epsilon is positive and small.
    /// * `clairaut` - Clairaut's constant.
    #[must_use]
    pub fn calculate_epsilon(&self, clairaut: trig::UnitNegRange) -> f64 {
        ellipsoid::calculate_epsilon(clairaut, self.ep_2)
    }

    /// Calculate a3f from the A3 series `coefficients` of the ellipsoid.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_a3f(&self, eps: f64) -> f64 {
        ellipsoid::coefficients::evaluate_polynomial(&self.a3, eps)
    }

    /// Calculate a3c from the A3 series `coefficients` of the ellipsoid.
    /// * `clairaut` - Clairaut's constant.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_a3c(&self, clairaut: trig::UnitNegRange, eps: f64) -> f64 {
        self.f * clairaut.0 * self.calculate_a3f(eps)
    }

    /// Calculate the coefficients `C3[l]` in the Fourier expansion of `C3`.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_c3y(&self, eps: f64) -> [f64; 6] {
        ellipsoid::coefficients::evaluate_coeffs_c3y(&self.c3x, eps)
    }

    /// Calculate the coefficients `C4[l]` in the Fourier expansion of `C4`.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_c4y(&self, eps: f64) -> [f64; 6] {
        ellipsoid::coefficients::evaluate_coeffs_c4y(&self.c4x, eps)
    }

    /// Convert a geodetic Latitude to a parametric Latitude on the
    /// auxiliary sphere.
    /// * `lat` - the geodetic Latitude
    #[must_use]
    pub fn calculate_parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::calculate_parametric_latitude(lat, self.one_minus_f)
    }

    /// Convert a parametric Latitude on the auxiliary sphere to a
    /// geodetic Latitude.
    /// * `beta` - the parametric Latitude
    #[must_use]
    pub fn calculate_geodetic_latitude(&self, beta: Angle) -> Angle {
        ellipsoid::calculate_geodetic_latitude(beta, self.one_minus_f)
    }
}

/// A static instance of the WGS-84 `Ellipsoid`.
pub static WGS84_ELLIPSOID: Lazy<Ellipsoid> = Lazy::new(Ellipsoid::wgs84);

/// Calculate the azimuths and geodesic length (in metres) between a pair
/// of positions on the ellipsoid, i.e. solve the inverse problem.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
/// * `tolerance` - the tolerance to perform the calculation to.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the azimuth at the start position, the length of the geodesic
/// on the ellipsoid in metres and the azimuth at the finish position.
///
/// # Examples
/// ```
/// use ellipsoid_geodesic::*;
/// use unit_sphere::great_circle;
///
/// let tolerance = Radians(great_circle::MIN_VALUE);
///
/// let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
/// let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));
/// let (azimuth, length, end_azimuth) =
///     calculate_azimuths_and_geodesic_length(&istanbul, &washington, tolerance, &WGS84_ELLIPSOID);
///
/// let azimuth_degrees = Degrees::from(azimuth);
/// println!("Istanbul-Washington initial azimuth: {:?}", azimuth_degrees.0);
///
/// let distance_nm = NauticalMiles::from(length);
/// println!("Istanbul-Washington distance: {:?}", distance_nm);
///
/// let azimuth_degrees = Degrees::from(end_azimuth.opposite());
/// println!("Washington-Istanbul initial azimuth: {:?}", azimuth_degrees.0);
/// ```
#[must_use]
pub fn calculate_azimuths_and_geodesic_length(
    a: &LatLong,
    b: &LatLong,
    tolerance: Radians,
    ellipsoid: &Ellipsoid,
) -> (Angle, Metres, Angle) {
    let values = geodesic::calculate_inverse_values(a, b, Caps::NONE, tolerance, ellipsoid);
    (values.azimuth, values.distance, values.end_azimuth)
}

/// Calculate the end position and azimuth of a geodesic given its start
/// position, azimuth and length, i.e. solve the direct problem.
///
/// A negative distance traverses the geodesic in the opposite direction.
/// * `a` - the start position in geodetic coordinates.
/// * `azimuth` - the azimuth at the start position.
/// * `distance` - the distance along the geodesic in metres.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the end position in geodetic coordinates and the azimuth at the
/// end position.
///
/// # Examples
/// ```
/// use ellipsoid_geodesic::*;
/// use angle_sc::is_within_tolerance;
///
/// let a = LatLong::new(Degrees(42.0), Degrees(29.0));
/// let azimuth = Angle::from(Degrees(90.0));
///
/// let (b, end_azimuth) =
///     calculate_direct_position(&a, azimuth, Metres(100_000.0), &WGS84_ELLIPSOID);
///
/// // A due East geodesic curves towards the Equator
/// assert!(b.lat().0 < a.lat().0);
/// assert!(is_within_tolerance(30.21, b.lon().0, 0.01));
/// assert!(Degrees::from(end_azimuth).0 > 90.0);
/// ```
#[must_use]
pub fn calculate_direct_position(
    a: &LatLong,
    azimuth: Angle,
    distance: Metres,
    ellipsoid: &Ellipsoid,
) -> (LatLong, Angle) {
    let line = GeodesicLine::from_lat_lon_azi(a, azimuth, Caps::STANDARD, ellipsoid);
    let arc_distance = line.metres_to_radians(distance);
    let sigma = Angle::from(arc_distance);
    (
        line.arc_lat_long(arc_distance, sigma),
        line.arc_azimuth(sigma),
    )
}

/// The position and auxiliary quantities at a point along a [`GeodesicLine`].
///
/// Fields whose capability was not requested when the line was constructed
/// are `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicPosition {
    /// The great circle arc distance travelled on the auxiliary sphere.
    pub arc_length: Radians,
    /// The latitude of the position.
    pub latitude: Option<Degrees>,
    /// The longitude of the position, unrolled if `Caps::LONG_UNROLL` is set.
    pub longitude: Option<Degrees>,
    /// The azimuth at the position.
    pub azimuth: Option<Degrees>,
    /// The distance of the position along the geodesic.
    pub distance: Option<Metres>,
    /// The reduced length of the geodesic to the position.
    pub reduced_length: Option<Metres>,
    /// The geodesic scale of the position relative to the start point.
    pub start_scale: Option<f64>,
    /// The geodesic scale of the start point relative to the position.
    pub end_scale: Option<f64>,
    /// The area under the geodesic to the position, in square metres.
    pub area: Option<f64>,
}

impl GeodesicPosition {
    /// An empty result: no quantities calculated.
    #[must_use]
    const fn empty() -> Self {
        Self {
            arc_length: Radians(f64::NAN),
            latitude: None,
            longitude: None,
            azimuth: None,
            distance: None,
            reduced_length: None,
            start_scale: None,
            end_scale: None,
            area: None,
        }
    }
}

/// A geodesic path on the surface of an ellipsoid, represented by a great
/// circle arc on the auxiliary sphere.
///
/// A `GeodesicLine` holds a start position and azimuth together with the
/// series coefficient values selected by its [`Caps`], so that repeated
/// position queries along the geodesic avoid repeating the setup cost.
/// It is immutable after construction and may be shared freely between
/// threads.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicLine<'a> {
    /// The parametric start latitude on the auxiliary sphere.
    beta: Angle,
    /// The start longitude.
    lon: Angle,
    /// The start azimuth.
    azi: Angle,
    /// Azimuth at the Equator.
    azi0: Angle,
    /// Great circle arc distance to the first Equator crossing.
    sigma1: Angle,
    /// Great circle arc length on the auxiliary sphere in radians.
    arc_length: Radians,
    /// The capabilities of the line.
    caps: Caps,
    /// Integration constant: epsilon, derived from Clairaut's constant.
    eps: f64,
    /// The Karney ellipsoid correction term at the start position.
    dn1: f64,
    /// constant used to convert geodesic/great circle distances.
    a1: f64,
    /// constant used to convert geodesic/great circle longitudes.
    a3c: f64,
    /// constant used to convert azimuth excesses to areas.
    a4: f64,
    /// Start parameter for geodesic/great circle distance differences.
    b11: Radians,
    /// Start parameter for geodesic/great circle longitude differences.
    b31: Radians,
    /// Start parameter for the area integral.
    b41: f64,
    /// The C1 series coefficients at epsilon.
    c1: [f64; 7],
    /// The C3 series coefficients at epsilon.
    c3: [f64; 6],
    /// The C4 series coefficients at epsilon, only with `Caps::AREA`.
    c4: [f64; 6],
    /// A reference to the underlying `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
}

impl Validate for GeodesicLine<'_> {
    /// Test whether a `GeodesicLine` is valid.
    /// Whether the start latitude is within -90 to 90 degrees and the
    /// reference arc length is finite.
    fn is_valid(&self) -> bool {
        self.beta.cos().0 >= 0.0 && self.arc_length.0.is_finite()
    }
}

impl<'a> GeodesicLine<'a> {
    /// Construct a `GeodesicLine`
    /// * `beta` - the start point parametric latitude on the auxiliary sphere.
    /// * `lon` - the start point longitude.
    /// * `azi` - the start azimuth.
    /// * `arc_length` - the reference great circle arc length on the
    ///   auxiliary sphere in radians.
    /// * `caps` - the capabilities of the line.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn new(
        beta: Angle,
        lon: Angle,
        azi: Angle,
        arc_length: Radians,
        caps: Caps,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        // latitudes and azimuths can always be calculated
        let caps = caps | Caps::LATITUDE | Caps::AZIMUTH;

        // Calculate the azimuth at the first Equator crossing
        let clairaut = trig::UnitNegRange(azi.sin().0 * beta.cos().0);
        let azi0 = Angle::new(clairaut, trig::swap_sin_cos(clairaut));

        // Calculate the distance to the first Equator crossing
        let sigma1 = Angle::from_y_x(beta.sin().0, beta.cos().0 * azi.cos().0);

        // Calculate the series coefficient values for the capabilities
        let eps = ellipsoid.calculate_epsilon(azi0.sin());
        let c1 = ellipsoid::coefficients::evaluate_coeffs_c1(eps);
        let c3 = ellipsoid.calculate_c3y(eps);
        let (a4, c4, b41) = if caps.contains(Caps::C4) {
            let a4 = ellipsoid.a().0 * ellipsoid.a().0 * azi0.cos().0 * azi0.sin().0
                * ellipsoid.e_2();
            let c4 = ellipsoid.calculate_c4y(eps);
            let b41 = ellipsoid::coefficients::cosine_series(&c4, sigma1);
            (a4, c4, b41)
        } else {
            (0.0, [0.0; 6], 0.0)
        };
        Self {
            beta,
            lon,
            azi,
            azi0,
            sigma1,
            arc_length,
            caps,
            eps,
            dn1: libm::sqrt(1.0 + ellipsoid.ep_2() * beta.sin().0 * beta.sin().0),
            a1: ellipsoid::coefficients::evaluate_a1(eps) + 1.0,
            a3c: ellipsoid.calculate_a3c(azi0.sin(), eps),
            a4,
            b11: ellipsoid::coefficients::sin_cos_series(&c1, sigma1),
            b31: ellipsoid::coefficients::sin_cos_series(&c3, sigma1),
            b41,
            c1,
            c3,
            c4,
            ellipsoid,
        }
    }

    /// Construct a `GeodesicLine` from a start position and azimuth.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `caps` - the capabilities of the line.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn from_lat_lon_azi(
        a: &LatLong,
        azimuth: Angle,
        caps: Caps,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        let a_lat = Angle::from(a.lat());
        let a_lon = Angle::from(a.lon());
        GeodesicLine::new(
            ellipsoid.calculate_parametric_latitude(a_lat),
            a_lon,
            azimuth,
            Radians(0.0),
            caps,
            ellipsoid,
        )
    }

    /// Construct a `GeodesicLine` using the "direct" method with the
    /// reference length given as an arc length on the auxiliary sphere.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `arc_length` - the great circle arc length on the auxiliary sphere
    ///   in radians.
    /// * `caps` - the capabilities of the line.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn from_lat_lon_azi_arc_length(
        a: &LatLong,
        azimuth: Angle,
        arc_length: Radians,
        caps: Caps,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        let mut line = Self::from_lat_lon_azi(a, azimuth, caps, ellipsoid);
        line.set_arc_length(arc_length);
        line
    }

    /// Construct a `GeodesicLine` using the "direct" method with the
    /// reference length in metres.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `length` - the length on the `Ellipsoid` in metres.
    /// * `caps` - the capabilities of the line.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn from_lat_lon_azi_length(
        a: &LatLong,
        azimuth: Angle,
        length: Metres,
        caps: Caps,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        let mut line = Self::from_lat_lon_azi(a, azimuth, caps | Caps::DISTANCE_IN, ellipsoid);
        let arc_length = line.metres_to_radians(length);
        line.set_arc_length(arc_length);
        line
    }

    /// Construct a `GeodesicLine` between a pair of positions, the
    /// "indirect" method: the inverse problem is solved once to fix the
    /// azimuth and reference arc length.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a`, `b` - the start and finish positions in geodetic coordinates.
    /// * `tolerance` - the tolerance to perform the inverse calculation to.
    /// * `caps` - the capabilities of the line.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn between_positions(
        a: &LatLong,
        b: &LatLong,
        tolerance: Radians,
        caps: Caps,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        let (azimuth, arc_length, _, _) =
            geodesic::calculate_azimuths_arc_length(a, b, tolerance, ellipsoid);
        Self::from_lat_lon_azi_arc_length(a, azimuth, arc_length, caps | Caps::DISTANCE, ellipsoid)
    }

    /// Accessor for the start parametric latitude on the auxiliary sphere.
    #[must_use]
    pub const fn beta(&self) -> Angle {
        self.beta
    }

    /// Accessor for the start longitude.
    #[must_use]
    pub const fn lon(&self) -> Angle {
        self.lon
    }

    /// Accessor for the start azimuth.
    #[must_use]
    pub const fn azi(&self) -> Angle {
        self.azi
    }

    /// Accessor for the capabilities of the line.
    #[must_use]
    pub const fn capabilities(&self) -> Caps {
        self.caps
    }

    /// Set the reference `arc_length` of a `GeodesicLine`
    /// * `arc_length` - the great circle arc length of the `GeodesicLine`.
    pub fn set_arc_length(&mut self, arc_length: Radians) -> &mut Self {
        self.arc_length = arc_length;
        self
    }

    /// Accessor for the reference arc length on the auxiliary sphere in radians.
    #[must_use]
    pub const fn arc_length(&self) -> Radians {
        self.arc_length
    }

    /// Accessor for the reference to the underlying `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// Convert a distance in metres on the ellipsoid to radians on the
    /// auxiliary sphere.
    /// * `distance` - the distance along the `GeodesicLine` in metres.
    ///
    /// returns the distance along the great circle arc in radians.
    #[must_use]
    pub fn metres_to_radians(&self, distance: Metres) -> Radians {
        if libm::fabs(distance.0) < great_circle::MIN_VALUE {
            Radians(0.0)
        } else {
            let tau12 = Radians(distance.0 / (self.ellipsoid.b().0 * self.a1));
            let tau_sum = Angle::from(self.b11 + tau12);
            let c1p = ellipsoid::coefficients::evaluate_coeffs_c1p(self.eps);
            let b12 = ellipsoid::coefficients::sin_cos_series(&c1p, self.sigma1 + tau_sum);

            tau12 + b12 + self.b11
        }
    }

    /// Convert a great circle distance in radians on the auxiliary sphere to
    /// metres on the ellipsoid.
    /// * `arc_distance` - the great circle distance in radians on the auxiliary sphere.
    /// * `sigma` the `arc_distance` as an `Angle`.
    ///
    /// returns the distance in metres on the ellipsoid.
    #[must_use]
    pub fn radians_to_metres(&self, arc_distance: Radians, sigma: Angle) -> Metres {
        let sigma_sum = self.sigma1 + sigma;
        let b12 = ellipsoid::coefficients::sin_cos_series(&self.c1, sigma_sum);
        Metres(self.ellipsoid.b().0 * self.a1 * (arc_distance + b12 - self.b11).0)
    }

    /// Accessor for the length of the `GeodesicLine` in metres: the distance
    /// to the reference arc length.
    #[must_use]
    pub fn length(&self) -> Metres {
        self.radians_to_metres(self.arc_length, Angle::from(self.arc_length))
    }

    /// Calculate the parametric latitude at the great circle arc distance.
    /// * `sigma` - the arc distance on the auxiliary sphere as an Angle.
    ///
    /// return the parametric latitude of the position at sigma.
    #[must_use]
    pub fn arc_beta(&self, sigma: Angle) -> Angle {
        great_circle::calculate_latitude(self.beta, self.azi, sigma)
    }

    /// Calculate the geodetic latitude at the great circle arc distance.
    /// * `sigma` - the arc distance on the auxiliary sphere as an Angle.
    ///
    /// return the geodetic latitude of the position at `sigma`.
    #[must_use]
    pub fn arc_latitude(&self, sigma: Angle) -> Angle {
        self.ellipsoid
            .calculate_geodetic_latitude(self.arc_beta(sigma))
    }

    /// Calculate the azimuth at the great circle arc distance.
    /// * `sigma` - the arc distance on the auxiliary sphere as an Angle.
    ///
    /// return the azimuth at `sigma`.
    #[must_use]
    pub fn arc_azimuth(&self, sigma: Angle) -> Angle {
        const MAX_LAT: f64 = 1.0 - great_circle::MIN_VALUE;

        let sigma_sum = self.sigma1 + sigma;
        let sin_beta = self.azi0.cos().0 * sigma_sum.sin().0;

        // if at North pole, only valid azimuth is due South
        if MAX_LAT < sin_beta {
            Angle::new(trig::UnitNegRange(0.0), trig::UnitNegRange(-1.0))
        } else {
            Angle::from_y_x(self.azi0.sin().0, self.azi0.cos().0 * sigma_sum.cos().0)
        }
    }

    /// The longitude of the start point from the Northward Equator crossing
    /// on the auxiliary sphere.
    ///
    /// At a pole the azimuth defines the reference meridian.
    #[must_use]
    fn omega1(&self) -> Angle {
        if self.beta.cos().0 < great_circle::MIN_VALUE {
            Angle::from_y_x(self.azi.sin().0 * self.beta.sin().0, self.azi.cos().0)
        } else {
            Angle::from_y_x(
                self.azi0.sin().0 * self.beta.sin().0,
                self.beta.cos().0 * self.azi.cos().0,
            )
        }
    }

    /// Calculate the geodesic longitude difference at arc distance
    /// along the auxiliary sphere.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    /// * `sigma` - the arc distance as an Angle.
    ///
    /// return the longitude difference from the start point.
    #[must_use]
    pub fn delta_longitude(&self, arc_distance: Radians, sigma: Angle) -> Angle {
        if arc_distance.abs().0 < great_circle::MIN_VALUE {
            Angle::default()
        } else {
            // The great circle distance from Northward Equator crossing.
            let sigma_sum = self.sigma1 + sigma;

            // The longitude difference on the auxiliary sphere, omega12.
            let omega12 =
                Angle::from_y_x(self.azi0.sin().0 * sigma_sum.sin().0, sigma_sum.cos().0)
                    - self.omega1();

            let b32 = ellipsoid::coefficients::sin_cos_series(&self.c3, sigma_sum);

            omega12 - Angle::from(Radians(self.a3c * (arc_distance.0 + (b32 - self.b31).0)))
        }
    }

    /// Calculate the geodesic longitude difference at the arc distance,
    /// unrolled: the result is unbounded and monotonic along the line.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    /// * `sigma` - the arc distance as an Angle.
    ///
    /// return the unrolled longitude difference from the start point in Radians.
    #[must_use]
    pub fn delta_longitude_unrolled(&self, arc_distance: Radians, sigma: Angle) -> Radians {
        let sigma_sum = self.sigma1 + sigma;

        // the sign of Clairaut's constant determines the direction of unrolling
        let east = libm::copysign(1.0, self.azi0.sin().0);

        let omega1 = self.omega1();
        let sin_omega1 = omega1.sin().0;
        let cos_omega1 = omega1.cos().0;
        let sin_omega2 = self.azi0.sin().0 * sigma_sum.sin().0;
        let cos_omega2 = sigma_sum.cos().0;

        // the unrolled longitude difference on the auxiliary sphere
        let omega12 = east
            * (arc_distance.0
                - (Radians::from(sigma_sum).0 - Radians::from(self.sigma1).0)
                + (libm::atan2(east * sin_omega2, cos_omega2)
                    - libm::atan2(east * sin_omega1, cos_omega1)));

        let b32 = ellipsoid::coefficients::sin_cos_series(&self.c3, sigma_sum);
        Radians(omega12 - self.a3c * (arc_distance.0 + (b32 - self.b31).0))
    }

    /// Calculate the geodesic `LatLong` at the arc distance along
    /// the auxiliary sphere.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    /// * `sigma` - the arc distance as an Angle.
    ///
    /// return the `LatLong` of the geodesic position at `arc_distance`.
    #[must_use]
    pub fn arc_lat_long(&self, arc_distance: Radians, sigma: Angle) -> LatLong {
        LatLong::new(
            Degrees::from(self.arc_latitude(sigma)),
            Degrees::from(self.lon + self.delta_longitude(arc_distance, sigma)),
        )
    }

    /// Calculate the geodesic `LatLong` at the distance along the `GeodesicLine`.
    /// * `distance` - the distance in `Metres`.
    ///
    /// return the `LatLong` of the geodesic position at `distance`.
    #[must_use]
    pub fn lat_long(&self, distance: Metres) -> LatLong {
        let arc_distance = self.metres_to_radians(distance);
        self.arc_lat_long(arc_distance, Angle::from(arc_distance))
    }

    /// Calculate the azimuth at the length along the geodesic.
    /// * `distance` - the distance along the `GeodesicLine`, in metres.
    ///
    /// return the azimuth of the geodesic/great circle at length.
    #[must_use]
    pub fn azimuth(&self, distance: Metres) -> Angle {
        let sigma = Angle::from(self.metres_to_radians(distance));
        self.arc_azimuth(sigma)
    }

    /// Calculate the quantities selected by the line's capabilities at the
    /// arc distance along the auxiliary sphere.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    ///
    /// return the [`GeodesicPosition`] at `arc_distance`.
    #[must_use]
    pub fn arc_position(&self, arc_distance: Radians) -> GeodesicPosition {
        let sigma = Angle::from(arc_distance);
        let sigma_sum = self.sigma1 + sigma;
        let beta2 = self.arc_beta(sigma);

        let mut position = GeodesicPosition::empty();
        position.arc_length = arc_distance;

        if self.caps.contains(Caps::LATITUDE) {
            position.latitude = Some(Degrees::from(
                self.ellipsoid.calculate_geodetic_latitude(beta2),
            ));
        }
        if self.caps.contains(Caps::LONGITUDE) {
            position.longitude = if self.caps.contains(Caps::LONG_UNROLL) {
                let delta = self.delta_longitude_unrolled(arc_distance, sigma);
                Some(Degrees(
                    Degrees::from(self.lon).0 + delta.0.to_degrees(),
                ))
            } else {
                Some(Degrees::from(
                    self.lon + self.delta_longitude(arc_distance, sigma),
                ))
            };
        }
        if self.caps.contains(Caps::AZIMUTH) {
            position.azimuth = Some(Degrees::from(self.arc_azimuth(sigma)));
        }
        if self.caps.contains(Caps::DISTANCE) {
            position.distance = Some(self.radians_to_metres(arc_distance, sigma));
        }
        if self.caps.contains(Caps::C2) {
            let dn2 = libm::sqrt(1.0 + self.ellipsoid.ep_2() * beta2.sin().0 * beta2.sin().0);
            let lengths = geodesic::calculate_lengths(
                self.eps,
                arc_distance,
                self.sigma1,
                self.dn1,
                sigma_sum,
                dn2,
                self.beta.cos().0,
                beta2.cos().0,
                self.ellipsoid.ep_2(),
            );
            if self.caps.contains(Caps::REDUCED_LENGTH) {
                position.reduced_length = Some(Metres(self.ellipsoid.b().0 * lengths.m12_b));
            }
            if self.caps.contains(Caps::GEODESIC_SCALE) {
                position.start_scale = Some(lengths.m12_ratio);
                position.end_scale = Some(lengths.m21_ratio);
            }
        }
        if self.caps.contains(Caps::AREA) {
            position.area = Some(self.arc_area(sigma, sigma_sum));
        }

        position
    }

    /// Calculate the quantities selected by the line's capabilities at the
    /// distance along the geodesic.
    ///
    /// The line must have the `Caps::DISTANCE_IN` capability, otherwise an
    /// empty result is returned.
    /// * `distance` - the signed distance along the `GeodesicLine` in metres.
    ///
    /// return the [`GeodesicPosition`] at `distance`.
    #[must_use]
    pub fn position(&self, distance: Metres) -> GeodesicPosition {
        if !self.caps.contains(Caps::DISTANCE_IN) {
            return GeodesicPosition::empty();
        }
        let arc_distance = self.metres_to_radians(distance);
        let mut position = self.arc_position(arc_distance);
        // report the distance as given, not as converted back from the arc
        if self.caps.contains(Caps::DISTANCE) {
            position.distance = Some(distance);
        }
        position
    }

    /// Calculate the area under the geodesic between the start point and the
    /// point at `sigma`: from the geodesic to the Equator, in square metres.
    ///
    /// CFF Karney, Eqs 59 to 63.
    /// * `sigma` - the arc distance as an Angle.
    /// * `sigma_sum` - the arc distance of the position from the Northward
    ///   Equator crossing.
    #[must_use]
    fn arc_area(&self, sigma: Angle, sigma_sum: Angle) -> f64 {
        let b42 = ellipsoid::coefficients::cosine_series(&self.c4, sigma_sum);

        let sin_alpha0 = self.azi0.sin().0;
        let cos_alpha0 = self.azi0.cos().0;

        let (sin_alpha12, cos_alpha12) = if (cos_alpha0 == 0.0) || (sin_alpha0 == 0.0) {
            // a meridional or equatorial geodesic: use the azimuth difference
            let alpha2 = self.arc_azimuth(sigma);
            (
                alpha2.sin().0 * self.azi.cos().0 - alpha2.cos().0 * self.azi.sin().0,
                alpha2.cos().0 * self.azi.cos().0 + alpha2.sin().0 * self.azi.sin().0,
            )
        } else {
            let sin_sigma12 = sigma.sin().0;
            let cos_sigma12 = sigma.cos().0;
            (
                cos_alpha0
                    * sin_alpha0
                    * (if cos_sigma12 <= 0.0 {
                        self.sigma1.cos().0 * (1.0 - cos_sigma12) + sin_sigma12 * self.sigma1.sin().0
                    } else {
                        sin_sigma12
                            * (self.sigma1.cos().0 * sin_sigma12 / (1.0 + cos_sigma12)
                                + self.sigma1.sin().0)
                    }),
                sin_alpha0 * sin_alpha0 + cos_alpha0 * cos_alpha0 * self.sigma1.cos().0
                    * sigma_sum.cos().0,
            )
        };

        self.ellipsoid.sq_authalic_radius() * libm::atan2(sin_alpha12, cos_alpha12)
            + self.a4 * (b42 - self.b41)
    }
}

impl From<(&LatLong, Angle, Radians)> for GeodesicLine<'_> {
    /// Construct a `GeodesicLine` on the WGS-84 `Ellipsoid` using the "direct"
    /// method with the length in `Radians` and the standard capabilities.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `arc_length` - the great circle arc length on the auxiliary sphere in radians.
    fn from(params: (&LatLong, Angle, Radians)) -> Self {
        GeodesicLine::from_lat_lon_azi_arc_length(
            params.0,
            params.1,
            params.2,
            Caps::STANDARD,
            &WGS84_ELLIPSOID,
        )
    }
}

impl From<(&LatLong, Angle, Metres)> for GeodesicLine<'_> {
    /// Construct a `GeodesicLine` on the WGS-84 `Ellipsoid` using the "direct"
    /// method with the length in metres and the standard capabilities.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `length` - the length on the `Ellipsoid` in metres.
    fn from(params: (&LatLong, Angle, Metres)) -> Self {
        GeodesicLine::from_lat_lon_azi_length(
            params.0,
            params.1,
            params.2,
            Caps::STANDARD,
            &WGS84_ELLIPSOID,
        )
    }
}

impl From<(&LatLong, &LatLong)> for GeodesicLine<'_> {
    /// Construct a `GeodesicLine` between a pair of positions on the WGS-84
    /// `Ellipsoid`, the "indirect" method, with the standard capabilities.
    /// @pre |lat| <= 90.0 degrees.
    /// * `a`, `b` - the start and finish positions in geodetic coordinates.
    fn from(params: (&LatLong, &LatLong)) -> Self {
        Self::between_positions(
            params.0,
            params.1,
            Radians(great_circle::MIN_VALUE),
            Caps::STANDARD,
            &WGS84_ELLIPSOID,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_caps() {
        // output capabilities carry their series bits
        assert!(Caps::LONGITUDE.contains(Caps::C3));
        assert!(Caps::DISTANCE.contains(Caps::C1));
        assert!(Caps::DISTANCE_IN.contains(Caps::C1P));
        assert!(Caps::REDUCED_LENGTH.contains(Caps::C2));
        assert!(Caps::GEODESIC_SCALE.contains(Caps::C2));
        assert!(Caps::AREA.contains(Caps::C4));

        // contains is reflexive and monotonic under union
        let caps = Caps::DISTANCE | Caps::AREA;
        assert!(caps.contains(Caps::DISTANCE));
        assert!(caps.contains(Caps::AREA));
        assert!(caps.contains(caps));
        assert!(!caps.contains(Caps::REDUCED_LENGTH));
        assert!(Caps::ALL.contains(caps));
        assert!(Caps::STANDARD.contains(Caps::LATITUDE | Caps::LONGITUDE | Caps::AZIMUTH));
        assert_eq!(Caps::DISTANCE, (Caps::DISTANCE | Caps::AREA) & Caps::DISTANCE);
        assert!(!Caps::NONE.contains(Caps::LATITUDE));
    }

    #[test]
    fn test_ellipsoid_wgs84() {
        let geoid = Ellipsoid::wgs84();
        assert_eq!(ellipsoid::wgs84::A, geoid.a());
        assert_eq!(ellipsoid::wgs84::F, geoid.f());
        assert_eq!(
            ellipsoid::calculate_minor_axis(ellipsoid::wgs84::A, ellipsoid::wgs84::F),
            geoid.b()
        );
        assert_eq!(1.0 - ellipsoid::wgs84::F, geoid.one_minus_f());
        assert_eq!(1.0 / (1.0 - ellipsoid::wgs84::F), geoid.recip_one_minus_f());
        assert_eq!(
            ellipsoid::calculate_sq_eccentricity(ellipsoid::wgs84::F),
            geoid.e_2()
        );
        assert_eq!(
            ellipsoid::calculate_sq_2nd_eccentricity(ellipsoid::wgs84::F),
            geoid.ep_2()
        );
        assert_eq!(
            ellipsoid::calculate_3rd_flattening(ellipsoid::wgs84::F),
            geoid.n()
        );

        // the area of the WGS 84 ellipsoid, approx 5.101e14 square metres
        assert!(is_within_tolerance(5.101e14, geoid.area(), 5.0e11));
    }

    #[test]
    fn test_ellipsoid_traits() {
        let geoid = Ellipsoid::wgs84();

        let geoid_clone = geoid.clone();
        assert!(geoid_clone == geoid);

        println!("Ellipsoid: {:?}", geoid);
    }

    #[test]
    fn test_calculate_azimuths_and_geodesic_length_karney() {
        let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
        let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));
        let (azimuth, length, end_azimuth) = calculate_azimuths_and_geodesic_length(
            &istanbul,
            &washington,
            Radians(great_circle::MIN_VALUE),
            &WGS84_ELLIPSOID,
        );

        assert!(is_within_tolerance(
            -50.69375304113997,
            Degrees::from(azimuth).0,
            1.0e-9
        ));
        assert!(is_within_tolerance(8_339_863.136, length.0, 1.0e-3));
        assert!(is_within_tolerance(
            -132.2646607116376,
            Degrees::from(end_azimuth).0,
            1.0e-9
        ));
    }

    #[test]
    fn test_direct_problem_regression() {
        // equatorial radius 6378137.0 m, flattening 1/298.257223563,
        // start (40.64, -73.78), azimuth 45, distance 10,000,000 m
        let a = LatLong::new(Degrees(40.64), Degrees(-73.78));
        let azimuth = Angle::from(Degrees(45.0));
        let distance = Metres(10_000_000.0);

        let (b, end_azimuth) =
            calculate_direct_position(&a, azimuth, distance, &WGS84_ELLIPSOID);

        assert!(is_within_tolerance(32.621_100_46, b.lat().0, 1.0e-6));
        assert!(is_within_tolerance(49.052_487_09, b.lon().0, 1.0e-6));
        assert!(is_within_tolerance(
            140.405_985_88,
            Degrees::from(end_azimuth).0,
            1.0e-6
        ));
    }

    #[test]
    fn test_direct_problem_zero_and_negative_distance() {
        let a = LatLong::new(Degrees(40.64), Degrees(-73.78));
        let azimuth = Angle::from(Degrees(45.0));

        // zero distance returns the start point unchanged
        let (b, _) = calculate_direct_position(&a, azimuth, Metres(0.0), &WGS84_ELLIPSOID);
        assert!(is_within_tolerance(a.lat().0, b.lat().0, 1.0e-12));
        assert!(is_within_tolerance(a.lon().0, b.lon().0, 1.0e-12));

        // a negative distance reverses the direction of the geodesic
        let (b, _) =
            calculate_direct_position(&a, azimuth, Metres(-1_000_000.0), &WGS84_ELLIPSOID);
        assert!(b.lat().0 < a.lat().0);
        assert!(b.lon().0 < a.lon().0);
    }

    #[test]
    fn test_inverse_problem_regression() {
        // inverse from (40.64, -73.78) to (1.36, 103.99),
        // distance approx 1.53e7 m
        let a = LatLong::new(Degrees(40.64), Degrees(-73.78));
        let b = LatLong::new(Degrees(1.36), Degrees(103.99));

        let (_, length, _) = calculate_azimuths_and_geodesic_length(
            &a,
            &b,
            Radians(great_circle::MIN_VALUE),
            &WGS84_ELLIPSOID,
        );
        assert!(is_within_tolerance(1.53e7, length.0, 1.0e5));
    }

    #[test]
    fn test_direct_inverse_round_trip() {
        let a = LatLong::new(Degrees(-30.0), Degrees(125.0));
        let azimuth = Angle::from(Degrees(72.5));
        let distance = Metres(7_500_000.0);

        let (b, _) = calculate_direct_position(&a, azimuth, distance, &WGS84_ELLIPSOID);
        let (azimuth_2, length, _) = calculate_azimuths_and_geodesic_length(
            &a,
            &b,
            Radians(great_circle::MIN_VALUE),
            &WGS84_ELLIPSOID,
        );

        // sub-millimetre distance agreement
        assert!(is_within_tolerance(distance.0, length.0, 1.0e-3));
        assert!(is_within_tolerance(
            72.5,
            Degrees::from(azimuth_2).0,
            1.0e-10
        ));
    }

    #[test]
    fn test_geodesic_line_direct_constructors() {
        let length = Metres(9_000_000.0);
        let arc_length = Radians(core::f64::consts::FRAC_PI_2);

        let a = LatLong::new(Degrees(45.0), Degrees(45.0));

        // Increase azimuth around compass from due South to due North
        for i in -180..180 {
            let azi = i as f64;
            let azimuth = Angle::from(Degrees(azi));

            let line1 = GeodesicLine::from((&a, azimuth, length));
            assert!(line1.is_valid());
            let azi0 = line1.azimuth(Metres(0.0));
            assert!(is_within_tolerance(
                Radians::from(azimuth).0,
                Radians::from(azi0).0,
                2.0 * f64::EPSILON
            ));

            let len0 = line1.length();
            assert!(is_within_tolerance(length.0, len0.0, 1.0e-8));

            let line2 = GeodesicLine::from((&a, azimuth, arc_length));
            assert!(line2.is_valid());
            let azi0 = line2.azimuth(Metres(0.0));
            assert!(is_within_tolerance(
                Radians::from(azimuth).0,
                Radians::from(azi0).0,
                2.0 * f64::EPSILON
            ));

            assert!(is_within_tolerance(arc_length.0, line2.arc_length().0, 1.0e-8));
        }
    }

    #[test]
    fn test_geodesic_line_position_matches_direct() {
        let a = LatLong::new(Degrees(40.64), Degrees(-73.78));
        let azimuth = Angle::from(Degrees(45.0));

        let line = GeodesicLine::from_lat_lon_azi(&a, azimuth, Caps::STANDARD, &WGS84_ELLIPSOID);

        for i in 0..11 {
            let distance = Metres(1_000_000.0 * f64::from(i));
            let position = line.position(distance);
            let (direct, direct_azimuth) =
                calculate_direct_position(&a, azimuth, distance, &WGS84_ELLIPSOID);

            assert!(is_within_tolerance(
                direct.lat().0,
                position.latitude.unwrap().0,
                1.0e-12
            ));
            assert!(is_within_tolerance(
                direct.lon().0,
                position.longitude.unwrap().0,
                1.0e-12
            ));
            assert!(is_within_tolerance(
                Degrees::from(direct_azimuth).0,
                position.azimuth.unwrap().0,
                1.0e-12
            ));
            assert_eq!(distance, position.distance.unwrap());
        }
    }

    #[test]
    fn test_geodesic_line_capability_gating() {
        let a = LatLong::new(Degrees(40.64), Degrees(-73.78));
        let azimuth = Angle::from(Degrees(45.0));

        // a minimal line calculates positions but no auxiliary quantities
        let line = GeodesicLine::from_lat_lon_azi(&a, azimuth, Caps::DISTANCE_IN, &WGS84_ELLIPSOID);
        let position = line.position(Metres(1_000_000.0));
        assert!(position.latitude.is_some());
        assert!(position.azimuth.is_some());
        assert!(position.longitude.is_none());
        assert!(position.distance.is_none());
        assert!(position.reduced_length.is_none());
        assert!(position.start_scale.is_none());
        assert!(position.area.is_none());

        // a line without DISTANCE_IN cannot accept a distance query
        let line = GeodesicLine::from_lat_lon_azi(&a, azimuth, Caps::NONE, &WGS84_ELLIPSOID);
        let position = line.position(Metres(1_000_000.0));
        assert!(position.arc_length.0.is_nan());
        assert!(position.latitude.is_none());

        // but it can accept an arc length query
        let position = line.arc_position(Radians(0.1));
        assert!(position.latitude.is_some());
        assert!(position.azimuth.is_some());
        assert!(position.distance.is_none());
    }

    #[test]
    fn test_geodesic_line_auxiliary_quantities() {
        let a = LatLong::new(Degrees(40.0), Degrees(-75.0));
        let azimuth = Angle::from(Degrees(30.0));

        let line = GeodesicLine::from_lat_lon_azi(
            &a,
            azimuth,
            Caps::STANDARD | Caps::REDUCED_LENGTH | Caps::GEODESIC_SCALE | Caps::AREA,
            &WGS84_ELLIPSOID,
        );

        // the auxiliary quantities at zero distance
        let position = line.position(Metres(0.0));
        assert!(is_within_tolerance(
            0.0,
            position.reduced_length.unwrap().0,
            1.0e-9
        ));
        assert!(is_within_tolerance(1.0, position.start_scale.unwrap(), 1.0e-12));
        assert!(is_within_tolerance(1.0, position.end_scale.unwrap(), 1.0e-12));
        assert!(is_within_tolerance(0.0, position.area.unwrap(), 1.0e-3));

        // the reduced length approaches the arc on a short geodesic
        let position = line.position(Metres(100_000.0));
        assert!(is_within_tolerance(
            100_000.0,
            position.reduced_length.unwrap().0,
            100.0
        ));
        // the geodesic scales are close to one
        assert!(is_within_tolerance(1.0, position.start_scale.unwrap(), 1.0e-3));
        assert!(is_within_tolerance(1.0, position.end_scale.unwrap(), 1.0e-3));
        // a North East bound geodesic has positive area under it
        assert!(position.area.unwrap() > 0.0);
    }

    #[test]
    fn test_geodesic_line_between_positions() {
        let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
        let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));

        let line = GeodesicLine::from((&istanbul, &washington));
        assert!(line.is_valid());

        let end_azimuth = Degrees::from(line.azimuth(line.length()));
        assert!(is_within_tolerance(-132.2646607116376, end_azimuth.0, 1.0e-9));

        // test start position
        assert!(is_within_tolerance(
            42.0,
            Degrees::from(WGS84_ELLIPSOID.calculate_geodetic_latitude(line.beta())).0,
            32.0 * f64::EPSILON
        ));
        assert!(is_within_tolerance(
            29.0,
            Degrees::from(line.lon()).0,
            16.0 * f64::EPSILON
        ));

        // test end position
        let lat_long = line.lat_long(line.length());
        assert!(is_within_tolerance(
            washington.lat().0,
            lat_long.lat().0,
            1.0e-9
        ));
        assert!(is_within_tolerance(
            washington.lon().0,
            lat_long.lon().0,
            1.0e-9
        ));

        // an inverse line always has the distance capability
        assert!(line.capabilities().contains(Caps::DISTANCE));
    }

    #[test]
    fn test_geodesic_line_between_positions_from_pole() {
        let north_pole = LatLong::new(Degrees(90.0), Degrees(0.0));
        let b = LatLong::new(Degrees(40.0), Degrees(50.0));

        let line = GeodesicLine::from((&north_pole, &b));

        // at a pole the azimuth selects the meridian the line descends
        assert!(is_within_tolerance(130.0, Degrees::from(line.azi()).0, 1.0e-9));

        let lat_long = line.lat_long(line.length());
        assert!(is_within_tolerance(b.lat().0, lat_long.lat().0, 1.0e-9));
        assert!(is_within_tolerance(b.lon().0, lat_long.lon().0, 1.0e-9));
    }

    #[test]
    fn test_geodesic_line_monotonic_sampling() {
        // waypoints at tenths of the total distance are evenly spaced
        let a = LatLong::new(Degrees(10.0), Degrees(-85.0));
        let b = LatLong::new(Degrees(55.0), Degrees(45.0));

        let line = GeodesicLine::between_positions(
            &a,
            &b,
            Radians(great_circle::MIN_VALUE),
            Caps::STANDARD,
            &WGS84_ELLIPSOID,
        );
        let total = line.length();

        let mut previous = a;
        let mut cumulative = 0.0;
        for i in 1..11 {
            let fraction = f64::from(i) / 10.0;
            let waypoint = line.lat_long(Metres(total.0 * fraction));

            let (_, step, _) = calculate_azimuths_and_geodesic_length(
                &previous,
                &waypoint,
                Radians(great_circle::MIN_VALUE),
                &WGS84_ELLIPSOID,
            );
            // each step is a tenth of the total, to within a metre
            assert!(is_within_tolerance(total.0 / 10.0, step.0, 1.0));
            cumulative += step.0;
            previous = waypoint;
        }
        assert!(is_within_tolerance(total.0, cumulative, 1.0));
    }

    #[test]
    fn test_geodesic_line_unrolled_longitude() {
        // an Eastbound line crossing the antimeridian
        let a = LatLong::new(Degrees(10.0), Degrees(170.0));
        let azimuth = Angle::from(Degrees(90.0));

        let line = GeodesicLine::from_lat_lon_azi(
            &a,
            azimuth,
            Caps::STANDARD | Caps::LONG_UNROLL,
            &WGS84_ELLIPSOID,
        );

        let mut previous = 170.0;
        for i in 1..6 {
            let position = line.position(Metres(1_000_000.0 * f64::from(i)));
            let longitude = position.longitude.unwrap().0;
            // monotonic and unbounded past 180 degrees
            assert!(longitude > previous);
            previous = longitude;
        }
        assert!(previous > 180.0);

        // the same line without LONG_UNROLL wraps to -180 to 180
        let wrapped = GeodesicLine::from_lat_lon_azi(&a, azimuth, Caps::STANDARD, &WGS84_ELLIPSOID);
        let position = wrapped.position(Metres(5_000_000.0));
        let longitude = position.longitude.unwrap().0;
        assert!((-180.0..=180.0).contains(&longitude));
        assert!(is_within_tolerance(previous - 360.0, longitude, 1.0e-9));
    }

    #[test]
    fn test_sphere_inverse_antipodal() {
        // antipodal points on a sphere have infinitely many shortest paths:
        // the solver picks the meridian through the start longitude
        let sphere = Ellipsoid::new(Metres(6_371_000.0), 0.0);

        let a = LatLong::new(Degrees(0.0), Degrees(30.0));
        let b = LatLong::new(Degrees(0.0), Degrees(-150.0));

        let (azimuth, length, _) = calculate_azimuths_and_geodesic_length(
            &a,
            &b,
            Radians(great_circle::MIN_VALUE),
            &sphere,
        );
        // a meridional solution, half the circumference long
        let azimuth = Degrees::from(azimuth).0.abs();
        assert!(azimuth < 1.0e-9 || (180.0 - azimuth) < 1.0e-9);
        assert!(is_within_tolerance(
            core::f64::consts::PI * 6_371_000.0,
            length.0,
            1.0e-6
        ));
    }
}
