// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Open run ends.
//!
//! Runs after junction and riser detection: an end already covered by one of
//! those points (in plan, within `open_end_tol`) is a joint, not an open end.
//! Short runs never report ends.

use crate::config::StakeoutConfig;
use crate::elevation::bop_elevation;
use crate::segment::Segment;
use crate::types::{PointKind, StakeoutPoint};

pub fn detect_open_ends(
    runs: &[Segment],
    detected: &[StakeoutPoint],
    config: &StakeoutConfig,
) -> Vec<StakeoutPoint> {
    let mut points = Vec::new();

    for seg in runs.iter().filter(|s| s.is_regular()) {
        for end in 0..2 {
            if config.skip_joined_open_ends && seg.joined[end] {
                continue;
            }

            let c = seg.endpoint(end);
            let covered = detected
                .iter()
                .any(|p| p.plan_distance(c.x, c.y) <= config.open_end_tol);
            if covered {
                continue;
            }

            let z = bop_elevation(seg, end as f64);
            points.push(StakeoutPoint::new(c.x, c.y, z, PointKind::OpenEnd));
        }
    }

    tracing::info!(open_ends = points.len(), "Open-end detection complete");
    points
}
