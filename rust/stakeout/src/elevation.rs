// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bottom-of-pipe elevation along a run.

use crate::segment::Segment;

/// Centerline elevation at station `t` (any real `t`, extensions included).
pub fn centerline_z(seg: &Segment, t: f64) -> f64 {
    seg.c0.z + (seg.c1.z - seg.c0.z) * t
}

/// Bottom-of-pipe elevation at station `t`.
///
/// The wall offset shrinks with slope, so a steep run drops less than its
/// full radius below the centerline.
pub fn bop_elevation(seg: &Segment, t: f64) -> f64 {
    centerline_z(seg, t) - seg.rad_vertical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::RunKind;
    use crate::types::PartId;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn sloped_run_midpoint() {
        let seg = Segment::new(
            PartId(1),
            RunKind::Regular,
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(10.0, 0.0, 0.0),
            0.1,
            0.0,
        )
        .unwrap();

        let uz = (0.0 - 10.0) / 200f64.sqrt();
        let expected = 5.0 - 0.1 * (1.0 - uz * uz).sqrt();
        assert_relative_eq!(bop_elevation(&seg, 0.5), expected, epsilon = 1e-12);
    }

    #[test]
    fn flat_run_drops_full_radius() {
        let seg = Segment::new(
            PartId(1),
            RunKind::Regular,
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 8.0, 3.0),
            0.25,
            0.0,
        )
        .unwrap();
        assert_relative_eq!(bop_elevation(&seg, 0.0), 2.75, epsilon = 1e-12);
        assert_relative_eq!(bop_elevation(&seg, 1.0), 2.75, epsilon = 1e-12);
    }

    #[test]
    fn extrapolates_outside_the_run() {
        let seg = Segment::new(
            PartId(1),
            RunKind::Regular,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 1.0),
            0.0,
            0.0,
        )
        .unwrap();
        assert_relative_eq!(centerline_z(&seg, -0.5), -0.5, epsilon = 1e-12);
        assert_relative_eq!(centerline_z(&seg, 1.5), 1.5, epsilon = 1e-12);
    }
}
