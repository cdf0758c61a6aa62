// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment classification.
//!
//! Every two-connector part whose connector axes are opposed is a straight
//! candidate. Its plan length and vertical span decide what it becomes:
//!
//! | plan length            | vertical span   | class   |
//! |------------------------|-----------------|---------|
//! | `<= vert_plan_tol`     | `>= vert_min_z` | riser   |
//! | `>= reg_min_plan_len`  |                 | regular |
//! | `>= short_min_plan_len`|                 | short   |
//! | shorter                |                 | dropped |
//!
//! Parts with any other connector count (fittings, tees, caps) are graph
//! nodes only.

use nalgebra::{Point3, Vector3};

use crate::config::StakeoutConfig;
use crate::radius::resolve_outside_radius;
use crate::segment::{Riser, RunKind, Segment};
use crate::types::{Connector, PartId, PartRecord};

/// Outcome of classifying one part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartClass {
    Run(Segment),
    Riser(Riser),
    /// Straight, but too short in plan and not tall enough to be a riser.
    Degenerate,
    /// Two connectors whose axes are not opposed (elbows, offsets).
    NotStraight,
    /// Not a two-connector part.
    NotRun,
    /// A connector origin was missing or non-finite.
    MissingGeometry,
}

/// Counts collected while classifying a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    pub regular: usize,
    pub short: usize,
    pub risers: usize,
    pub degenerate: usize,
    pub not_straight: usize,
    pub not_run: usize,
    pub missing_geometry: usize,
}

/// Runs and risers in input order.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub runs: Vec<Segment>,
    pub risers: Vec<Riser>,
    pub stats: ClassifyStats,
}

impl Classified {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.risers.is_empty()
    }
}

/// Classifies every part. Unusable parts are counted and skipped.
pub fn classify_parts(parts: &[PartRecord], config: &StakeoutConfig) -> Classified {
    let mut out = Classified::default();

    for part in parts {
        match classify_part(part, config) {
            PartClass::Run(seg) => {
                match seg.kind {
                    RunKind::Regular => out.stats.regular += 1,
                    RunKind::Short => out.stats.short += 1,
                }
                out.runs.push(seg);
            }
            PartClass::Riser(riser) => {
                out.stats.risers += 1;
                out.risers.push(riser);
            }
            PartClass::Degenerate => {
                tracing::debug!(part = %part.id, "Dropping degenerate run");
                out.stats.degenerate += 1;
            }
            PartClass::NotStraight => {
                tracing::debug!(part = %part.id, "Connector axes not opposed, not a run");
                out.stats.not_straight += 1;
            }
            PartClass::NotRun => out.stats.not_run += 1,
            PartClass::MissingGeometry => {
                tracing::debug!(part = %part.id, "Skipping part with unreadable geometry");
                out.stats.missing_geometry += 1;
            }
        }
    }

    out
}

/// Classifies a single part.
pub fn classify_part(part: &PartRecord, config: &StakeoutConfig) -> PartClass {
    let [a, b] = match part.connectors.as_slice() {
        [a, b] => [a, b],
        _ => return PartClass::NotRun,
    };

    let (Some(c0), Some(c1)) = (a.point(), b.point()) else {
        return PartClass::MissingGeometry;
    };

    if !axes_opposed(a, b, config.colinear_dot) {
        return PartClass::NotStraight;
    }

    let lp = (c1.xy() - c0.xy()).norm();
    let dz = (c1.z - c0.z).abs();

    if lp <= config.vert_plan_tol && dz >= config.vert_min_z {
        return PartClass::Riser(Riser::new(part.id, c0, c1));
    }

    let kind = if lp >= config.reg_min_plan_len {
        RunKind::Regular
    } else if lp >= config.short_min_plan_len {
        RunKind::Short
    } else {
        return PartClass::Degenerate;
    };

    match build_segment(part.id, kind, c0, c1, part, config) {
        Some(seg) => PartClass::Run(seg.with_joined([a.is_joined(), b.is_joined()])),
        None => PartClass::Degenerate,
    }
}

fn build_segment(
    id: PartId,
    kind: RunKind,
    c0: Point3<f64>,
    c1: Point3<f64>,
    part: &PartRecord,
    config: &StakeoutConfig,
) -> Option<Segment> {
    let (radius, source) = resolve_outside_radius(part, config.fallback_radius);
    tracing::trace!(part = %id, radius, ?source, "Resolved outside radius");
    let ext = config.extension_for_radius(radius);
    Segment::new(id, kind, c0, c1, radius, ext)
}

/// Whether two connector axes point in opposite directions.
///
/// Missing or zero-length axes are assumed straight: hosts frequently omit
/// axis data on plain pipe.
fn axes_opposed(a: &Connector, b: &Connector, threshold: f64) -> bool {
    let (Some(da), Some(db)) = (unit_axis(a), unit_axis(b)) else {
        return true;
    };
    da.dot(&db) <= threshold
}

fn unit_axis(connector: &Connector) -> Option<Vector3<f64>> {
    let [x, y, z] = connector.direction?;
    let v = Vector3::new(x, y, z);
    let n = v.norm();
    (n.is_finite() && n > 1e-12).then(|| v / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectorRef;

    fn two_connector(
        id: u64,
        a: [f64; 3],
        b: [f64; 3],
        axes: Option<([f64; 3], [f64; 3])>,
    ) -> PartRecord {
        let mut part = PartRecord::new(id);
        part.outside_radius = Some(0.05);
        part.connectors = vec![
            Connector {
                origin: Some(a),
                direction: axes.map(|(da, _)| da),
                ..Default::default()
            },
            Connector {
                origin: Some(b),
                direction: axes.map(|(_, db)| db),
                ..Default::default()
            },
        ];
        part
    }

    #[test]
    fn regular_run() {
        let part = two_connector(
            1,
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            Some(([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0])),
        );
        let PartClass::Run(seg) = classify_part(&part, &StakeoutConfig::default()) else {
            panic!("expected a run");
        };
        assert_eq!(seg.kind, RunKind::Regular);
        assert!((seg.lp - 10.0).abs() < 1e-12);
        assert!((seg.rad_out - 0.05).abs() < 1e-12);
    }

    #[test]
    fn short_run() {
        let part = two_connector(1, [0.0, 0.0, 0.0], [0.3, 0.0, 0.0], None);
        assert!(matches!(
            classify_part(&part, &StakeoutConfig::default()),
            PartClass::Run(Segment { kind: RunKind::Short, .. })
        ));
    }

    #[test]
    fn riser() {
        let part = two_connector(
            1,
            [2.0, 3.0, 0.0],
            [2.0, 3.05, 6.0],
            Some(([0.0, 0.0, -1.0], [0.0, 0.0, 1.0])),
        );
        let PartClass::Riser(riser) = classify_part(&part, &StakeoutConfig::default()) else {
            panic!("expected a riser");
        };
        assert!((riser.anchor.y - 3.025).abs() < 1e-12);
    }

    #[test]
    fn short_and_flat_is_degenerate() {
        let part = two_connector(1, [0.0, 0.0, 0.0], [0.01, 0.0, 0.1], None);
        assert_eq!(
            classify_part(&part, &StakeoutConfig::default()),
            PartClass::Degenerate
        );
    }

    #[test]
    fn elbow_is_not_straight() {
        let part = two_connector(
            1,
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            Some(([-1.0, 0.0, 0.0], [0.0, 1.0, 0.0])),
        );
        assert_eq!(
            classify_part(&part, &StakeoutConfig::default()),
            PartClass::NotStraight
        );
    }

    #[test]
    fn missing_axis_is_assumed_straight() {
        let mut part = two_connector(
            1,
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            Some(([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0])),
        );
        part.connectors[1].direction = Some([0.0, 0.0, 0.0]);
        assert!(matches!(
            classify_part(&part, &StakeoutConfig::default()),
            PartClass::Run(_)
        ));
    }

    #[test]
    fn missing_origin_is_skipped() {
        let mut part = two_connector(1, [0.0, 0.0, 0.0], [4.0, 0.0, 0.0], None);
        part.connectors[0].origin = None;
        assert_eq!(
            classify_part(&part, &StakeoutConfig::default()),
            PartClass::MissingGeometry
        );

        part.connectors[0].origin = Some([f64::NAN, 0.0, 0.0]);
        assert_eq!(
            classify_part(&part, &StakeoutConfig::default()),
            PartClass::MissingGeometry
        );
    }

    #[test]
    fn joined_flags_follow_connectors() {
        let mut part = two_connector(1, [0.0, 0.0, 0.0], [4.0, 0.0, 0.0], None);
        part.connectors[1].joined.push(ConnectorRef {
            part: PartId(2),
            connector: 0,
        });
        let PartClass::Run(seg) = classify_part(&part, &StakeoutConfig::default()) else {
            panic!("expected a run");
        };
        assert_eq!(seg.joined, [false, true]);
    }

    #[test]
    fn batch_counts() {
        let mut tee = PartRecord::new(9);
        tee.connectors = vec![Connector::default(); 3];
        let parts = vec![
            two_connector(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], None),
            two_connector(2, [0.0, 0.0, 0.0], [0.2, 0.0, 0.0], None),
            two_connector(3, [0.0, 0.0, 0.0], [0.0, 0.0, 3.0], None),
            tee,
        ];
        let classified = classify_parts(&parts, &StakeoutConfig::default());
        assert_eq!(classified.runs.len(), 2);
        assert_eq!(classified.risers.len(), 1);
        assert_eq!(
            classified.stats,
            ClassifyStats {
                regular: 1,
                short: 1,
                risers: 1,
                not_run: 1,
                ..Default::default()
            }
        );
    }
}
