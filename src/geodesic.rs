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

//! The geodesic module solves the inverse problem: finding the azimuths,
//! length and auxiliary quantities of the geodesic path between two points
//! on the surface of an ellipsoid.
//!
//! The solution follows CFF Karney's method: both points are reduced to the
//! auxiliary sphere, the problem is put into a canonical form (start from the
//! point furthest from the Equator, in the Southern hemisphere, with a
//! positive longitude difference) and the initial azimuth is found with
//! Newton's method, seeded from the great circle solution or, near the
//! antipode, from the astroid problem. Meridional and equatorial geodesics
//! are solved directly without iteration.

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

use crate::ellipsoid::coefficients::{
    cosine_series, evaluate_a1, evaluate_a2, evaluate_coeffs_c1, evaluate_coeffs_c2,
    evaluate_coeffs_c3y, evaluate_coeffs_c4y, evaluate_polynomial, sin_cos_series,
};
use crate::ellipsoid::{calculate_epsilon, calculate_parametric_latitude};
use crate::{Caps, Ellipsoid};
use angle_sc::trig::{cosine_from_sine, UnitNegRange};
use angle_sc::{is_small, Angle, Radians};
use icao_units::si::Metres;
use unit_sphere::{great_circle, LatLong};

/// The maximum precision, in Radians.
pub const MAX_PRECISION: Radians = Radians(2.0 * f64::EPSILON);

/// The maximum number of iterations of the Newton loop.
const MAX_ITERATIONS: u32 = 20;

/// The azimuths, length and optional auxiliary quantities of a geodesic
/// between a pair of points.
///
/// The optional fields are only populated when the corresponding capability
/// was requested, see [`calculate_inverse_values`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseValues {
    /// The azimuth at the start point.
    pub azimuth: Angle,
    /// The azimuth at the finish point.
    pub end_azimuth: Angle,
    /// The great circle arc length on the auxiliary sphere in radians.
    pub arc_length: Radians,
    /// The length of the geodesic on the ellipsoid.
    pub distance: Metres,
    /// The reduced length of the geodesic.
    pub reduced_length: Option<Metres>,
    /// The geodesic scale of the finish point relative to the start point.
    pub start_scale: Option<f64>,
    /// The geodesic scale of the start point relative to the finish point.
    pub end_scale: Option<f64>,
    /// The area under the geodesic, from the geodesic to the Equator,
    /// in square metres.
    pub area: Option<f64>,
    /// The number of iterations of the Newton loop, zero for meridional and
    /// equatorial geodesics.
    pub iterations: u32,
}

/// Estimate omega12 by solving the astroid problem.
/// Solve k^4+2*k^3-(x^2+y^2-1)*k^2-2*y^2*k-y^2 = 0 for positive root k.
/// * `x`, `y` - astroid parameters, see Karney section 7.
///
/// returns the solution to the astroid problem.
#[must_use]
fn calculate_astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.0) / 6.0;

    // y = 0 with |x| <= 1
    // for y small, positive root is k = abs(y)/sqrt(1-x^2)
    if (q <= 0.0) && (r <= 0.0) {
        0.0
    } else {
        let s = p * q / 4.0;
        let r2 = r * r;
        let r3 = r * r2;
        let mut u = r;

        // The discriminant of the quadratic equation for T3.
        // This is zero on the evolute curve p^(1/3)+q^(1/3) = 1
        let discriminant = s * (s + 2.0 * r3);
        if 0.0 <= discriminant {
            let mut t3 = s + r3;
            // Pick the sign on the sqrt to maximize abs(T3), to minimise loss
            // of precision due to cancellation.
            t3 += if t3 < 0.0 {
                -libm::sqrt(discriminant)
            } else {
                libm::sqrt(discriminant)
            };
            let t = libm::cbrt(t3);
            u += if t == 0.0 { 0.0 } else { t + r2 / t };
        } else {
            // T is complex, but the way u is defined the result is real.
            let angle = libm::atan2(libm::sqrt(-discriminant), -(s + r3));
            // There are three possible cube roots.  We choose the root which
            // avoids cancellation.  Note: discriminant < 0 implies that r < 0.
            u += 2.0 * r * libm::cos(angle / 3.0);
        }

        let v = libm::sqrt(u * u + q); // guaranteed positive
        let uv = if u < 0.0 { q / (v - u) } else { u + v }; // u+v, guaranteed positive
        let w = (uv - q) / (2.0 * v); // positive?

        // Rearrange expression for k to avoid loss of accuracy due to subtraction.
        // Division by 0 not possible because uv > 0, w >= 0.
        uv / (libm::sqrt(uv + w * w) + w) // guaranteed positive
    }
}

/// The distance, reduced length and geodesic scales of a geodesic on the
/// auxiliary sphere, all in units of the Semiminor axis.
pub(crate) struct LengthValues {
    /// The distance, s12 / b.
    pub(crate) s12_b: f64,
    /// The reduced length, m12 / b.
    pub(crate) m12_b: f64,
    /// The geodesic scale M12.
    pub(crate) m12_ratio: f64,
    /// The geodesic scale M21.
    pub(crate) m21_ratio: f64,
}

/// Calculate the distance, reduced length and geodesic scales between a pair
/// of points on a geodesic from their arc distances from the Northward
/// Equator crossing.
///
/// CFF Karney, Eqs 38 to 40.
/// * `eps` - epsilon, derived from Clairaut's constant.
/// * `sigma12` - the arc length between the points on the auxiliary sphere.
/// * `sigma1`, `sigma2` - the arc distances of the points from the Northward
///   Equator crossing.
/// * `dn1`, `dn2` - the Karney ellipsoid correction terms at the points.
/// * `cos_beta1`, `cos_beta2` - the cosines of the parametric latitudes.
/// * `ep_2` - the square of the second Eccentricity of the ellipsoid.
#[must_use]
pub(crate) fn calculate_lengths(
    eps: f64,
    sigma12: Radians,
    sigma1: Angle,
    dn1: f64,
    sigma2: Angle,
    dn2: f64,
    cos_beta1: f64,
    cos_beta2: f64,
    ep_2: f64,
) -> LengthValues {
    let a1 = 1.0 + evaluate_a1(eps);
    let a2 = 1.0 + evaluate_a2(eps);
    let m0 = a1 - a2;

    let c1 = evaluate_coeffs_c1(eps);
    let c2 = evaluate_coeffs_c2(eps);

    let b1 = (sin_cos_series(&c1, sigma2) - sin_cos_series(&c1, sigma1)).0;
    let b2 = (sin_cos_series(&c2, sigma2) - sin_cos_series(&c2, sigma1)).0;

    let s12_b = a1 * (sigma12.0 + b1);
    let j12 = m0 * sigma12.0 + (a1 * b1 - a2 * b2);

    let m12_b = dn2 * (sigma1.cos().0 * sigma2.sin().0)
        - dn1 * (sigma1.sin().0 * sigma2.cos().0)
        - sigma1.cos().0 * sigma2.cos().0 * j12;

    let cos_sigma12 = sigma1.cos().0 * sigma2.cos().0 + sigma1.sin().0 * sigma2.sin().0;
    let t = ep_2 * (cos_beta1 - cos_beta2) * (cos_beta1 + cos_beta2) / (dn1 + dn2);
    let m12_ratio =
        cos_sigma12 + (t * sigma2.sin().0 - sigma2.cos().0 * j12) * sigma1.sin().0 / dn1;
    let m21_ratio =
        cos_sigma12 - (t * sigma1.sin().0 - sigma1.cos().0 * j12) * sigma2.sin().0 / dn2;

    LengthValues {
        s12_b,
        m12_b,
        m12_ratio,
        m21_ratio,
    }
}

/// Estimate the initial azimuth on the auxiliary sphere for a nearly antipodal arc.
/// It calculates and solves the astroid problem.
/// * `beta1`, `beta2` - the parametric latitudes of the start and finish points
///   on the auxiliary sphere.
/// * `lambda12` - Longitude difference between start and finish points.
///
/// returns the estimate of the initial azimuth on the auxiliary sphere.
#[must_use]
fn estimate_antipodal_initial_azimuth(
    beta1: Angle,
    beta2: Angle,
    lambda12: Angle,
    ellipsoid: &Ellipsoid,
) -> Angle {
    const Y_TOLERANCE: f64 = 200.0 * f64::EPSILON;
    const X_TOLERANCE: f64 = 2000.0 / core::f64::consts::FRAC_2_SQRT_PI;

    // Calculate the integration parameter for geodesic
    let clairaut = beta1.cos(); // Note: assumes sin_alpha_1 = 1
    let eps = calculate_epsilon(clairaut, ellipsoid.ep_2());
    let a3f = evaluate_polynomial(&ellipsoid.a3(), eps);

    let lamscale = ellipsoid.f() * beta1.cos().0 * a3f * core::f64::consts::PI;
    let betscale = lamscale * beta1.cos().0;

    // Solve astroid problem
    let x = Radians::from(lambda12.opposite()).0 / lamscale;
    let y = (beta1 + beta2).sin().0 / betscale;

    // Test x and y params
    if (x <= -(1.0 + X_TOLERANCE)) || (y < -Y_TOLERANCE) {
        let k = calculate_astroid(x, y);
        let omg12a = lamscale * (-x * k / (1.0 + k));

        let omega12 = Radians(core::f64::consts::PI - omg12a);
        great_circle::calculate_gc_azimuth(beta1, beta2, Angle::from(omega12))
    } else {
        let sin_alpha = UnitNegRange(if -x < 1.0 { -x } else { 1.0 });
        Angle::new(sin_alpha, cosine_from_sine(sin_alpha, -1.0))
    }
}

/// Calculate the cosine of the longitude difference from the equator crossing.
/// * `beta` the parametric latitude
/// * `cos_azimuth` the cosine of the azimuth at the parametric latitude
///
/// returns the cosine of the longitude difference, zero if the parametric
/// latitude is close to the equator.
#[must_use]
pub fn calculate_cos_omega(beta: Angle, cos_azimuth: UnitNegRange) -> UnitNegRange {
    if is_small(libm::fabs(beta.sin().0), f64::EPSILON) {
        UnitNegRange(1.0)
    } else {
        UnitNegRange(cos_azimuth.0 * beta.cos().0)
    }
}

/// Calculate the azimuth on the auxiliary sphere at latitude beta2 given the
/// latitude beta1 and the azimuth at that latitude, alpha1.
/// * `beta1`, `beta2` - the parametric latitudes of the start and finish points
///   on the auxiliary sphere.
/// * `alpha1` - start point azimuth.
///
/// returns the finish point azimuth.
#[must_use]
fn calculate_end_azimuth(beta1: Angle, beta2: Angle, alpha1: Angle) -> Angle {
    let clairaut = UnitNegRange(alpha1.sin().0 * beta1.cos().0);

    let sin_alpha2 = if beta2.cos() == beta1.cos() {
        alpha1.sin()
    } else {
        UnitNegRange::clamp(clairaut.0 / beta2.cos().0)
    };

    // Karney's method to calculate the cosine of the end azimuth
    let cos_alpha2 =
        if (beta2.cos() != beta1.cos()) || (libm::fabs(beta2.sin().0) != -beta1.sin().0) {
            let temp1 = alpha1.cos().0 * beta1.cos().0;
            let temp2 = if beta1.cos().0 < libm::fabs(beta1.sin().0) {
                (beta2.cos().0 - beta1.cos().0) * (beta1.cos().0 + beta2.cos().0)
            } else {
                (beta1.sin().0 - beta2.sin().0) * (beta1.sin().0 + beta2.sin().0)
            };
            let temp3 = temp1 * temp1 + temp2;
            let temp4 = if 0.0 < temp3 {
                libm::sqrt(temp3) / beta2.cos().0
            } else {
                0.0
            };
            UnitNegRange::clamp(temp4)
        } else {
            UnitNegRange(libm::fabs(alpha1.cos().0))
        };

    Angle::new(sin_alpha2, cos_alpha2)
}

/// Calculate the arc on the auxiliary sphere between a pair of arc distances
/// from the Northward Equator crossing, clamped to the range 0 to Pi.
#[must_use]
fn calculate_arc_difference(sigma1: Angle, sigma2: Angle) -> Angle {
    let mut sine = sigma1.cos().0 * sigma2.sin().0 - sigma1.sin().0 * sigma2.cos().0;
    // force a negative (or negative zero) sine to the positive zero branch
    if sine <= 0.0 {
        sine = 0.0;
    }
    let cosine = sigma1.cos().0 * sigma2.cos().0 + sigma1.sin().0 * sigma2.sin().0;
    Angle::from_y_x(sine, cosine)
}

/// Calculate the longitude difference between the auxiliary sphere and
/// ellipsoid.
#[must_use]
fn delta_omega12(
    clairaut: UnitNegRange,
    eps: f64,
    sigma12: Radians,
    sigma1: Angle,
    sigma2: Angle,
    ellipsoid: &Ellipsoid,
) -> f64 {
    let a3f = evaluate_polynomial(&ellipsoid.a3(), eps);
    let a3c = ellipsoid.f() * clairaut.0 * a3f;

    let c3 = evaluate_coeffs_c3y(&ellipsoid.c3x(), eps);
    let b31 = sin_cos_series(&c3, sigma1);
    let b32 = sin_cos_series(&c3, sigma2);

    a3c * (sigma12 + (b32 - b31)).0
}

/// The solution of the inverse problem on the auxiliary sphere, in the
/// canonical configuration.
struct AuxSolution {
    alpha1: Angle,
    alpha2: Angle,
    sigma1: Angle,
    sigma2: Angle,
    sigma12: Radians,
    omega12: Angle,
    eps: f64,
    iterations: u32,
}

/// Find the azimuth and great circle length on the auxiliary sphere.
/// It uses Newton's method to solve:
///   f(alp1) = lambda12(alp1) - lam12 = 0
///
/// @pre the input values are in canonical form: beta1 is the furthest from
/// the Equator, it is in the Southern hemisphere and lambda12 is positive.
/// * `beta1`, `beta2` - the parametric latitudes.
/// * `dn1`, `dn2` - the Karney ellipsoid correction terms.
/// * `lat1`, `lat2` - the geodetic latitudes.
/// * `lambda12` - Longitude difference between start and finish points.
/// * `gc_length` - the great circle distance between the points.
/// * `tolerance` - the tolerance to perform the calculation to.
///
/// returns the solution on the auxiliary sphere with the lowest longitude
/// difference residual found within the iteration limit.
#[must_use]
fn find_azimuth_and_aux_length(
    beta1: Angle,
    beta2: Angle,
    dn1: f64,
    dn2: f64,
    lat1: Angle,
    lat2: Angle,
    lambda12: Angle,
    gc_length: Radians,
    tolerance: Radians,
    ellipsoid: &Ellipsoid,
) -> AuxSolution {
    let tiny = libm::sqrt(f64::MIN_POSITIVE);
    let antipodal_arc_threshold: f64 = core::f64::consts::PI * ellipsoid.one_minus_f();

    // Estimate the azimuth at the start of the geodesic
    let mut alpha1 = if antipodal_arc_threshold < gc_length.0 {
        estimate_antipodal_initial_azimuth(beta1, beta2, lambda12, ellipsoid)
    } else {
        // Use great circle azimuth at the start
        great_circle::calculate_gc_azimuth(lat1, lat2, lambda12)
    };

    let mut best = AuxSolution {
        alpha1,
        alpha2: alpha1,
        sigma1: Angle::default(),
        sigma2: Angle::default(),
        sigma12: gc_length,
        omega12: lambda12,
        eps: ellipsoid.n(),
        iterations: 0,
    };
    let mut best_v = f64::MAX;

    for i in 0..MAX_ITERATIONS {
        // an equatorial start point due East (or West) stalls the iteration
        if (beta1.sin().0 == 0.0) && (alpha1.cos().0 == 0.0) {
            alpha1 = Angle::new(alpha1.sin(), UnitNegRange(-tiny));
        }

        // Calculate Clairaut's constant
        let clairaut = UnitNegRange(alpha1.sin().0 * beta1.cos().0);
        let eps = calculate_epsilon(clairaut, ellipsoid.ep_2());

        // Calculate first longitude (omega1) and distance (sigma1) from the
        // Northbound equator crossing
        let sin_omega1 = UnitNegRange(clairaut.0 * beta1.sin().0);
        let cos_omega1 = calculate_cos_omega(beta1, alpha1.cos());
        let omega1 = Angle::from_y_x(sin_omega1.0, cos_omega1.0);
        let sigma1 = Angle::from_y_x(beta1.sin().0, cos_omega1.0);

        // Calculate azimuth at the end point
        let alpha2 = calculate_end_azimuth(beta1, beta2, alpha1);

        // Calculate second longitude (omega2) and distance (sigma2) from the
        // Northbound equator crossing
        let sin_omega2 = UnitNegRange(clairaut.0 * beta2.sin().0);
        let cos_omega2 = calculate_cos_omega(beta2, alpha2.cos());
        let omega2 = Angle::from_y_x(sin_omega2.0, cos_omega2.0);
        let sigma2 = Angle::from_y_x(beta2.sin().0, cos_omega2.0);

        // Calculate Longitude difference and great circle length on the
        // auxiliary sphere, both clamped to the range 0 to Pi
        let omega12 = calculate_arc_difference(omega1, omega2);
        let sigma12 = calculate_arc_difference(sigma1, sigma2);
        let sigma12_rad = Radians::from(sigma12);

        // Calculate difference between geodesic and great circle longitudes
        let eta = Radians::from(omega12 - lambda12.abs());
        let domg12 = delta_omega12(clairaut, eps, sigma12_rad, sigma1, sigma2, ellipsoid);

        // Difference between differences
        let v = eta.0 - domg12;
        if libm::fabs(v) < best_v {
            best_v = libm::fabs(v);
            best = AuxSolution {
                alpha1,
                alpha2,
                sigma1,
                sigma2,
                sigma12: sigma12_rad,
                omega12,
                eps,
                iterations: i + 1,
            };
        }
        if is_small(libm::fabs(v), tolerance.0) {
            break;
        }

        // Calculate the denominator for Newton's method
        let dv = if is_small(libm::fabs(alpha2.cos().0), f64::EPSILON) {
            -2.0 * ellipsoid.one_minus_f() * dn1 / beta1.sin().0
        } else {
            let lengths = calculate_lengths(
                eps,
                sigma12_rad,
                sigma1,
                dn1,
                sigma2,
                dn2,
                beta1.cos().0,
                beta2.cos().0,
                ellipsoid.ep_2(),
            );
            ellipsoid.one_minus_f() * lengths.m12_b / (alpha2.cos().0 * beta2.cos().0)
        };
        if is_small(libm::fabs(dv), MAX_PRECISION.0) {
            break;
        }

        // Calculate the change in initial azimuth
        let dalpha1 = UnitNegRange::clamp(-v / dv);
        if is_small(libm::fabs(dalpha1.0), MAX_PRECISION.0) {
            break;
        }

        // Adjust the azimuth by dalpha1
        alpha1 = alpha1 + Angle::from(Radians(dalpha1.0));
    }

    best
}

/// Calculate the area under a geodesic in the canonical configuration:
/// from the geodesic to the Equator, in units of the square of the
/// Semimajor axis.
///
/// CFF Karney, Eqs 59 to 63.
/// * `meridian` - whether the geodesic runs along a meridian.
/// * `alpha1`, `alpha2` - the azimuths at the points.
/// * `beta1`, `beta2` - the parametric latitudes.
/// * `sigma1`, `sigma2` - the arc distances of the points from the Northward
///   Equator crossing.
/// * `omega12` - the longitude difference on the auxiliary sphere.
#[must_use]
fn calculate_canonical_area(
    meridian: bool,
    alpha1: Angle,
    alpha2: Angle,
    beta1: Angle,
    beta2: Angle,
    sigma1: Angle,
    sigma2: Angle,
    omega12: Angle,
    ellipsoid: &Ellipsoid,
) -> f64 {
    let tiny = libm::sqrt(f64::MIN_POSITIVE);

    // Clairaut's constant and the cosine of the equatorial azimuth
    let sin_alpha0 = alpha1.sin().0 * beta1.cos().0;
    let cos_alpha0 = libm::hypot(alpha1.cos().0, alpha1.sin().0 * beta1.sin().0);

    // The integral term, zero for meridional and equatorial geodesics
    let area = if (cos_alpha0 != 0.0) && (sin_alpha0 != 0.0) {
        let eps = calculate_epsilon(UnitNegRange::clamp(sin_alpha0), ellipsoid.ep_2());
        let a4 = ellipsoid.a().0 * ellipsoid.a().0 * cos_alpha0 * sin_alpha0 * ellipsoid.e_2();
        let c4 = evaluate_coeffs_c4y(&ellipsoid.c4x(), eps);
        let b41 = cosine_series(&c4, sigma1);
        let b42 = cosine_series(&c4, sigma2);
        a4 * (b42 - b41)
    } else {
        0.0
    };

    // The azimuth excess, alpha2 - alpha1
    let alpha12 = if !meridian
        && (omega12.cos().0 > -core::f64::consts::FRAC_1_SQRT_2)
        && (beta2.sin().0 - beta1.sin().0 < 1.75)
    {
        // use the half angle formulae for accuracy with a small excess
        let d_omega12 = 1.0 + omega12.cos().0;
        let d_beta1 = 1.0 + beta1.cos().0;
        let d_beta2 = 1.0 + beta2.cos().0;
        2.0 * libm::atan2(
            omega12.sin().0 * (beta1.sin().0 * d_beta2 + beta2.sin().0 * d_beta1),
            d_omega12 * (beta1.sin().0 * beta2.sin().0 + d_beta1 * d_beta2),
        )
    } else {
        let mut sin_alpha12 = alpha2.sin().0 * alpha1.cos().0 - alpha2.cos().0 * alpha1.sin().0;
        let mut cos_alpha12 = alpha2.cos().0 * alpha1.cos().0 + alpha2.sin().0 * alpha1.sin().0;
        // an azimuth excess of exactly Pi resolves to a positive half turn
        if (sin_alpha12 == 0.0) && (cos_alpha12 < 0.0) {
            sin_alpha12 = tiny * alpha1.cos().0;
            cos_alpha12 = -1.0;
        }
        libm::atan2(sin_alpha12, cos_alpha12)
    };

    area + ellipsoid.sq_authalic_radius() * alpha12
}

/// Calculate the azimuths, length and optional auxiliary quantities of the
/// geodesic between a pair of positions.
///
/// The distance, azimuths and arc length are always calculated; the reduced
/// length, geodesic scales and area are only calculated when the
/// corresponding [`Caps`] flag is set.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
/// * `caps` - the capabilities: which optional quantities to calculate.
/// * `tolerance` - the tolerance to perform the calculation to.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the [`InverseValues`] of the geodesic between `a` and `b`.
#[must_use]
pub fn calculate_inverse_values(
    a: &LatLong,
    b: &LatLong,
    caps: Caps,
    tolerance: Radians,
    ellipsoid: &Ellipsoid,
) -> InverseValues {
    const MIN_VALUE: f64 = 2.0 * f64::EPSILON;

    let lat_a = Angle::from(a.lat());
    let lat_b = Angle::from(b.lat());
    let lambda12 = Angle::from(b.lon() - a.lon());

    // Put the problem into canonical form:
    // start at the latitude furthest from the Equator
    let swap_latitudes = libm::fabs(lat_a.sin().0) < libm::fabs(lat_b.sin().0);
    let mut lat1 = if swap_latitudes { lat_b } else { lat_a };
    let mut lat2 = if swap_latitudes { lat_a } else { lat_b };

    // start South of the Equator
    let negate_latitude = 0.0 < lat1.sin().0;
    if negate_latitude {
        lat1 = -lat1;
        lat2 = -lat2;
    }

    // use a positive longitude difference
    let lambda12_negative = lambda12.sin().0 < 0.0;
    let abs_lambda12 = lambda12.abs();

    // project latitudes onto the auxiliary sphere
    let beta1 = calculate_parametric_latitude(lat1, ellipsoid.one_minus_f());
    let beta2 = calculate_parametric_latitude(lat2, ellipsoid.one_minus_f());

    let dn1 = libm::sqrt(1.0 + ellipsoid.ep_2() * beta1.sin().0 * beta1.sin().0);
    let dn2 = libm::sqrt(1.0 + ellipsoid.ep_2() * beta2.sin().0 * beta2.sin().0);

    let gc_azimuth = great_circle::calculate_gc_azimuth(lat1, lat2, abs_lambda12);
    let gc_length = great_circle::calculate_gc_distance(lat1, lat2, abs_lambda12);

    // the positions are effectively coincident
    if gc_length.0 <= MIN_VALUE {
        let azimuth = restore_azimuth_signs(
            gc_azimuth,
            gc_azimuth,
            swap_latitudes,
            negate_latitude,
            lambda12_negative,
        );
        return InverseValues {
            azimuth: azimuth.0,
            end_azimuth: azimuth.1,
            arc_length: Radians(0.0),
            distance: Metres(0.0),
            reduced_length: caps.contains(Caps::REDUCED_LENGTH).then_some(Metres(0.0)),
            start_scale: caps.contains(Caps::GEODESIC_SCALE).then_some(1.0),
            end_scale: caps.contains(Caps::GEODESIC_SCALE).then_some(1.0),
            area: caps.contains(Caps::AREA).then_some(0.0),
            iterations: 0,
        };
    }

    let solution = solve_canonical(
        beta1,
        beta2,
        dn1,
        dn2,
        lat1,
        lat2,
        abs_lambda12,
        gc_length,
        tolerance,
        ellipsoid,
    );

    let mut alpha1 = solution.aux.alpha1;
    let mut alpha2 = solution.aux.alpha2;
    let mut start_scale = solution.lengths.m12_ratio;
    let mut end_scale = solution.lengths.m21_ratio;

    // The area under the geodesic, restored to the original orientation
    let area = if caps.contains(Caps::AREA) {
        let mut canonical_area = calculate_canonical_area(
            solution.meridian,
            alpha1,
            alpha2,
            beta1,
            beta2,
            solution.aux.sigma1,
            solution.aux.sigma2,
            solution.aux.omega12,
            ellipsoid,
        );
        if lambda12_negative != negate_latitude {
            canonical_area = -canonical_area;
        }
        Some(canonical_area)
    } else {
        None
    };

    // Restore the azimuths and geodesic scales to the original orientation
    if swap_latitudes {
        core::mem::swap(&mut alpha1, &mut alpha2);
        core::mem::swap(&mut start_scale, &mut end_scale);
    }
    let azimuths = restore_azimuth_signs(
        alpha1,
        alpha2,
        swap_latitudes,
        negate_latitude,
        lambda12_negative,
    );

    InverseValues {
        azimuth: azimuths.0,
        end_azimuth: azimuths.1,
        arc_length: solution.aux.sigma12,
        distance: Metres(ellipsoid.b().0 * solution.lengths.s12_b),
        reduced_length: caps
            .contains(Caps::REDUCED_LENGTH)
            .then_some(Metres(ellipsoid.b().0 * solution.lengths.m12_b)),
        start_scale: caps.contains(Caps::GEODESIC_SCALE).then_some(start_scale),
        end_scale: caps.contains(Caps::GEODESIC_SCALE).then_some(end_scale),
        area,
        iterations: solution.aux.iterations,
    }
}

/// The solution of the inverse problem in the canonical configuration.
struct CanonicalSolution {
    /// The solution on the auxiliary sphere.
    aux: AuxSolution,
    /// The distance, reduced length and geodesic scales.
    lengths: LengthValues,
    /// Whether the geodesic runs along a meridian.
    meridian: bool,
}

/// Solve the inverse problem in the canonical configuration: beta1 furthest
/// from the Equator, in the Southern hemisphere, with a positive longitude
/// difference.
///
/// Meridional and equatorial geodesics are solved directly; all others with
/// Newton's method.
#[must_use]
fn solve_canonical(
    beta1: Angle,
    beta2: Angle,
    dn1: f64,
    dn2: f64,
    lat1: Angle,
    lat2: Angle,
    abs_lambda12: Angle,
    gc_length: Radians,
    tolerance: Radians,
    ellipsoid: &Ellipsoid,
) -> CanonicalSolution {
    const MIN_VALUE: f64 = 2.0 * f64::EPSILON;

    // A geodesic along a meridian: the start point is at a pole or the
    // longitude difference is zero or Pi.
    let meridian = (lat1.cos().0 < great_circle::MIN_VALUE)
        || (abs_lambda12.sin().0 < great_circle::MIN_VALUE);
    if meridian {
        // At a pole the azimuth follows the longitude difference.
        let alpha1 = Angle::new(abs_lambda12.sin(), abs_lambda12.cos());
        let alpha2 = Angle::new(UnitNegRange(0.0), UnitNegRange(1.0));

        let sigma1 = Angle::from_y_x(beta1.sin().0, alpha1.cos().0 * beta1.cos().0);
        let sigma2 = Angle::from_y_x(beta2.sin().0, alpha2.cos().0 * beta2.cos().0);
        let sigma12 = calculate_arc_difference(sigma1, sigma2);
        let sigma12_rad = Radians::from(sigma12);

        let clairaut = UnitNegRange(alpha1.sin().0 * beta1.cos().0);
        let eps = calculate_epsilon(clairaut, ellipsoid.ep_2());
        let lengths = calculate_lengths(
            eps,
            sigma12_rad,
            sigma1,
            dn1,
            sigma2,
            dn2,
            beta1.cos().0,
            beta2.cos().0,
            ellipsoid.ep_2(),
        );

        // the meridian is the shortest path unless it passes a conjugate point
        if (sigma12_rad.0 < 1.0) || (0.0 <= lengths.m12_b) {
            return CanonicalSolution {
                aux: AuxSolution {
                    alpha1,
                    alpha2,
                    sigma1,
                    sigma2,
                    sigma12: sigma12_rad,
                    omega12: Angle::default(),
                    eps,
                    iterations: 0,
                },
                lengths,
                meridian: true,
            };
        }
    }

    // A geodesic along the Equator, heading due East
    if !meridian
        && (beta1.sin().abs().0 < MIN_VALUE)
        && (beta2.sin().abs().0 < MIN_VALUE)
        && ((ellipsoid.f() <= 0.0)
            || (Radians::from(abs_lambda12).0 <= core::f64::consts::PI * ellipsoid.one_minus_f()))
    {
        let alpha = Angle::new(UnitNegRange(1.0), UnitNegRange(0.0));

        let lambda12_rad = Radians::from(abs_lambda12);
        let sigma12 = Radians(lambda12_rad.0 * ellipsoid.recip_one_minus_f());
        let omega12 = Angle::from(sigma12);

        // the distance is in units of the Semiminor axis, like the others
        let lengths = LengthValues {
            s12_b: sigma12.0,
            m12_b: omega12.sin().0,
            m12_ratio: omega12.cos().0,
            m21_ratio: omega12.cos().0,
        };
        return CanonicalSolution {
            aux: AuxSolution {
                alpha1: alpha,
                alpha2: alpha,
                sigma1: Angle::default(),
                sigma2: omega12,
                sigma12,
                omega12,
                eps: 0.0,
                iterations: 0,
            },
            lengths,
            meridian: false,
        };
    }

    // Iterate using Newton's method to find the azimuth and length
    let aux = find_azimuth_and_aux_length(
        beta1,
        beta2,
        dn1,
        dn2,
        lat1,
        lat2,
        abs_lambda12,
        gc_length,
        tolerance,
        ellipsoid,
    );
    let lengths = calculate_lengths(
        aux.eps,
        aux.sigma12,
        aux.sigma1,
        dn1,
        aux.sigma2,
        dn2,
        beta1.cos().0,
        beta2.cos().0,
        ellipsoid.ep_2(),
    );
    CanonicalSolution {
        aux,
        lengths,
        meridian: false,
    }
}

/// Transform a pair of azimuths from the canonical configuration back to the
/// original orientation of the points.
#[must_use]
fn restore_azimuth_signs(
    mut alpha1: Angle,
    mut alpha2: Angle,
    swap_latitudes: bool,
    negate_latitude: bool,
    lambda12_negative: bool,
) -> (Angle, Angle) {
    if swap_latitudes != negate_latitude {
        alpha1 = alpha1.negate_cos();
        alpha2 = alpha2.negate_cos();
    }

    if lambda12_negative {
        alpha1 = -alpha1;
        alpha2 = -alpha2;
    }

    (alpha1, alpha2)
}

/// Calculate the azimuths and great circle arc length on the auxiliary
/// sphere between a pair of positions.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
/// * `tolerance` - the tolerance to perform the calculation to.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the azimuth at the start of the geodesic, the great circle arc
/// length on the auxiliary sphere, the azimuth at the end of the geodesic
/// and the number of iterations required.
#[must_use]
pub fn calculate_azimuths_arc_length(
    a: &LatLong,
    b: &LatLong,
    tolerance: Radians,
    ellipsoid: &Ellipsoid,
) -> (Angle, Radians, Angle, u32) {
    let values = calculate_inverse_values(a, b, Caps::NONE, tolerance, ellipsoid);
    (
        values.azimuth,
        values.arc_length,
        values.end_azimuth,
        values.iterations,
    )
}

/// Convert a great circle distance on the auxiliary sphere in radians to
/// metres on the ellipsoid.
/// * `beta1`, the start parametric Latitude on the auxiliary sphere.
/// * `alpha1`, the azimuth at the start point.
/// * `gc_distance`, the great circle distance on the auxiliary sphere in radians.
/// * `ellipsoid`, the Ellipsoid
///
/// returns the geodesic distance in metres.
#[must_use]
pub fn convert_radians_to_metres(
    beta1: Angle,
    alpha1: Angle,
    gc_distance: Radians,
    ellipsoid: &Ellipsoid,
) -> Metres {
    // Calculate the distance from the first equator crossing
    let cos_omega1 = calculate_cos_omega(beta1, alpha1.cos());
    let sigma1 = Angle::from_y_x(beta1.sin().0, cos_omega1.0);
    let sigma_sum = sigma1 + Angle::from(gc_distance);

    // Calculate the ellipsoid coefficients
    let clairaut = UnitNegRange(alpha1.sin().0 * beta1.cos().0);
    let eps = calculate_epsilon(clairaut, ellipsoid.ep_2());
    let a1 = evaluate_a1(eps) + 1.0;
    let c1 = evaluate_coeffs_c1(eps);
    let b11 = sin_cos_series(&c1, sigma1);
    let b12 = sin_cos_series(&c1, sigma_sum);

    Metres(ellipsoid.b().0 * a1 * (gc_distance + b12 - b11).0)
}
