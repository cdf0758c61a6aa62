// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan (2D) line operations

use nalgebra::{Point2, Vector2};

/// Intersection of two plan segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    pub point: Point2<f64>,
    /// Parameter along the first segment
    pub ta: f64,
    /// Parameter along the second segment
    pub tb: f64,
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersect segments `[a0, a1]` and `[b0, b1]` with the determinant method
///
/// Returns `None` for (near-)parallel segments or when either parameter falls
/// outside `[-eps, 1 + eps]`.
pub fn segment_intersection(
    a0: &Point2<f64>,
    a1: &Point2<f64>,
    b0: &Point2<f64>,
    b1: &Point2<f64>,
    eps: f64,
) -> Option<LineHit> {
    let da = a1 - a0;
    let db = b1 - b0;
    let denom = cross(&da, &db);
    if denom.abs() < eps {
        return None;
    }

    let w = b0 - a0;
    let ta = cross(&w, &db) / denom;
    let tb = cross(&w, &da) / denom;

    let in_range = |t: f64| t >= -eps && t <= 1.0 + eps;
    if !in_range(ta) || !in_range(tb) {
        return None;
    }

    Some(LineHit {
        point: a0 + da * ta,
        ta,
        tb,
    })
}

/// Project a point onto a segment, clamped to the segment
///
/// Returns `(t, distance)` with `t` in `[0, 1]`. A degenerate segment
/// projects everything onto its start.
pub fn project_onto_segment(
    point: &Point2<f64>,
    start: &Point2<f64>,
    end: &Point2<f64>,
) -> (f64, f64) {
    let d = end - start;
    let length_sq = d.norm_squared();

    if length_sq < 1e-10 {
        return (0.0, (point - start).norm());
    }

    let t = ((point - start).dot(&d) / length_sq).clamp(0.0, 1.0);
    let projected = start + d * t;
    (t, (point - projected).norm())
}

/// Perpendicular distance from a point to a segment (clamped, not extended)
pub fn point_to_segment_distance(
    point: &Point2<f64>,
    start: &Point2<f64>,
    end: &Point2<f64>,
) -> f64 {
    project_onto_segment(point, start, end).1
}
