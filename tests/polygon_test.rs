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

extern crate ellipsoid_geodesic;

use angle_sc::{is_within_tolerance, Degrees};
use ellipsoid_geodesic::polygon::{calculate_polygon_perimeter_area, PolygonAccumulator};
use ellipsoid_geodesic::{LatLong, WGS84_ELLIPSOID};

/// An outline of Antarctica, the classic polygon area example: it encircles
/// the South pole and crosses the antimeridian.
const ANTARCTICA_VERTICES: &str = r#"[
    [-72.9, -74.0], [-71.9, -102.0], [-74.9, -102.0], [-74.3, -131.0],
    [-77.5, -163.0], [-77.4, 163.0], [-71.7, 132.0], [-65.9, 110.0],
    [-65.7, 88.0], [-66.6, 59.0], [-66.9, 25.0], [-69.8, -4.0],
    [-70.0, -14.0], [-71.0, -33.0], [-77.3, -46.0], [-77.9, -61.0],
    [-74.7, -69.0]
]"#;

fn read_antarctica_vertices() -> Vec<LatLong> {
    let values: Vec<(f64, f64)> = serde_json::from_str(ANTARCTICA_VERTICES).unwrap();
    values
        .iter()
        .map(|(lat, lon)| LatLong::new(Degrees(*lat), Degrees(*lon)))
        .collect()
}

#[test]
fn test_antarctica_area_and_perimeter() {
    let vertices = read_antarctica_vertices();

    let mut accumulator = PolygonAccumulator::new(&WGS84_ELLIPSOID, false);
    for vertex in &vertices {
        accumulator.add_point(vertex);
    }

    let (count, perimeter, area) = accumulator.compute(false, true);
    assert_eq!(17, count);
    assert!(is_within_tolerance(14_710_425.406_974, perimeter.0, 1.0));
    assert!(is_within_tolerance(
        1.337_685_668_220_74e13,
        area.unwrap(),
        1.0e4
    ));

    // reversing the traversal direction negates the area, exactly
    let (_, reverse_perimeter, reverse_area) = accumulator.compute(true, true);
    assert_eq!(perimeter, reverse_perimeter);
    assert_eq!(-area.unwrap(), reverse_area.unwrap());
}

#[test]
fn test_antarctica_unsigned_area() {
    let vertices = read_antarctica_vertices();

    let mut accumulator = PolygonAccumulator::new(&WGS84_ELLIPSOID, false);
    // traverse the outline in the opposite (clockwise) direction
    for vertex in vertices.iter().rev() {
        accumulator.add_point(vertex);
    }

    // the signed area is negative for a clockwise traversal
    let (_, _, signed) = accumulator.compute(false, true);
    assert!(signed.unwrap() < 0.0);

    // the unsigned convention reports the area of the enclosed complement
    let (_, _, unsigned) = accumulator.compute(false, false);
    assert!(is_within_tolerance(
        WGS84_ELLIPSOID.area() - 1.337_685_668_220_74e13,
        unsigned.unwrap(),
        1.0e4
    ));
}

#[test]
fn test_antarctica_polyline_length() {
    let vertices = read_antarctica_vertices();

    let mut polygon = PolygonAccumulator::new(&WGS84_ELLIPSOID, false);
    let mut polyline = PolygonAccumulator::new(&WGS84_ELLIPSOID, true);
    for vertex in &vertices {
        polygon.add_point(vertex);
        polyline.add_point(vertex);
    }

    let (_, perimeter, _) = polygon.compute(false, true);
    let (_, length, area) = polyline.compute(false, true);

    // an open polyline has no closing edge and no area
    assert!(length.0 < perimeter.0);
    assert!(area.is_none());
}

#[test]
fn test_antarctica_test_point_is_pure() {
    let vertices = read_antarctica_vertices();

    let mut accumulator = PolygonAccumulator::new(&WGS84_ELLIPSOID, false);
    // withhold the final vertex
    for vertex in &vertices[..16] {
        accumulator.add_point(vertex);
    }

    let trial = accumulator.test_point(&vertices[16], false, true);
    assert_eq!(17, trial.0);
    assert!(is_within_tolerance(14_710_425.406_974, (trial.1).0, 1.0));
    assert!(is_within_tolerance(
        1.337_685_668_220_74e13,
        trial.2.unwrap(),
        1.0e4
    ));

    // repeated tests return the same result and leave the accumulator alone
    let repeat = accumulator.test_point(&vertices[16], false, true);
    assert_eq!(trial, repeat);
    assert_eq!(16, accumulator.count());

    // completing the polygon for real matches the test result
    accumulator.add_point(&vertices[16]);
    let (count, perimeter, area) = accumulator.compute(false, true);
    assert_eq!(trial.0, count);
    assert_eq!(trial.1, perimeter);
    assert_eq!(trial.2, area);
}

#[test]
fn test_batch_polygon_area_antarctica() {
    let vertices = read_antarctica_vertices();
    let latitudes: Vec<f64> = vertices.iter().map(|v| v.lat().0).collect();
    let longitudes: Vec<f64> = vertices.iter().map(|v| v.lon().0).collect();

    let (perimeter, area) =
        calculate_polygon_perimeter_area(&latitudes, &longitudes, &WGS84_ELLIPSOID);

    assert!(is_within_tolerance(14_710_425.406_974, perimeter.0, 1.0));
    assert!(is_within_tolerance(1.337_685_668_220_74e13, area, 1.0e4));
}
