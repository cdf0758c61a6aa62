// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run and riser value types.

use nalgebra::{Point2, Point3, Vector2};

use crate::types::PartId;

/// Run category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// Long enough to report its own open ends.
    Regular,
    /// Stub that only helps junction and riser matching.
    Short,
}

/// A straight run between two connector points.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: PartId,
    pub kind: RunKind,
    /// Raw 3D endpoints
    pub c0: Point3<f64>,
    pub c1: Point3<f64>,
    /// Plan projections of `c0`, `c1`
    pub p0: Point2<f64>,
    pub p1: Point2<f64>,
    /// Plan endpoints pushed out by `ext` along the run
    pub e0: Point2<f64>,
    pub e1: Point2<f64>,
    /// Plan length `|p1 - p0|`
    pub lp: f64,
    pub ext: f64,
    pub rad_out: f64,
    /// `rad_out * sqrt(1 - uz^2)`, the vertical reach of the pipe wall
    pub rad_vertical: f64,
    /// Whether the connector at each end is joined to another part
    pub joined: [bool; 2],
}

impl Segment {
    /// Builds a run. Returns `None` for a zero plan length.
    pub fn new(
        id: PartId,
        kind: RunKind,
        c0: Point3<f64>,
        c1: Point3<f64>,
        rad_out: f64,
        ext: f64,
    ) -> Option<Self> {
        let p0 = c0.xy();
        let p1 = c1.xy();
        let plan = p1 - p0;
        let lp = plan.norm();
        if lp <= 0.0 || !lp.is_finite() {
            return None;
        }

        let u = plan / lp;
        let e0 = p0 - u * ext;
        let e1 = p1 + u * ext;

        let length = (c1 - c0).norm();
        let uz = (c1.z - c0.z) / length;
        let rad_vertical = rad_out * (1.0 - uz * uz).max(0.0).sqrt();

        Some(Self {
            id,
            kind,
            c0,
            c1,
            p0,
            p1,
            e0,
            e1,
            lp,
            ext,
            rad_out,
            rad_vertical,
            joined: [false; 2],
        })
    }

    pub fn with_joined(mut self, joined: [bool; 2]) -> Self {
        self.joined = joined;
        self
    }

    /// Plan unit direction from `p0` to `p1`.
    pub fn plan_direction(&self) -> Vector2<f64> {
        (self.p1 - self.p0) / self.lp
    }

    /// Plan length of the extended span `[e0, e1]`.
    pub fn extended_len(&self) -> f64 {
        self.lp + 2.0 * self.ext
    }

    /// Maps a parameter on `[e0, e1]` to a station on the true run.
    ///
    /// The result falls outside `[0, 1]` when the point lies in an extension.
    pub fn true_station(&self, t_ext: f64) -> f64 {
        (t_ext * self.extended_len() - self.ext) / self.lp
    }

    /// Centerline point at station `t`.
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.c0 + (self.c1 - self.c0) * t
    }

    /// Raw endpoint: `0` for `c0`, anything else for `c1`.
    pub fn endpoint(&self, end: usize) -> Point3<f64> {
        if end == 0 {
            self.c0
        } else {
            self.c1
        }
    }

    pub fn is_regular(&self) -> bool {
        self.kind == RunKind::Regular
    }
}

/// A near-vertical post.
#[derive(Debug, Clone, PartialEq)]
pub struct Riser {
    pub id: PartId,
    /// Plan position, the mean of both endpoints
    pub anchor: Point2<f64>,
    pub c0: Point3<f64>,
    pub c1: Point3<f64>,
}

impl Riser {
    pub fn new(id: PartId, c0: Point3<f64>, c1: Point3<f64>) -> Self {
        let anchor = Point2::from((c0.xy().coords + c1.xy().coords) / 2.0);
        Self { id, anchor, c0, c1 }
    }

    pub fn height(&self) -> f64 {
        (self.c1.z - self.c0.z).abs()
    }
}
