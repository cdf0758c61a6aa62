// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Near-duplicate point merging.

use crate::types::StakeoutPoint;

/// Greedy single-pass clustering.
///
/// A point joins the first earlier cluster within `xy_tol` in plan and
/// `z_tol` vertically; the cluster keeps its plan position and the lower
/// elevation. Output is in order of cluster creation.
pub fn deduplicate(points: Vec<StakeoutPoint>, xy_tol: f64, z_tol: f64) -> Vec<StakeoutPoint> {
    let mut clusters: Vec<StakeoutPoint> = Vec::with_capacity(points.len());

    for point in points {
        let existing = clusters.iter_mut().find(|c| {
            c.plan_distance(point.position.x, point.position.y) <= xy_tol
                && (c.position.z - point.position.z).abs() <= z_tol
        });

        match existing {
            Some(cluster) => cluster.position.z = cluster.position.z.min(point.position.z),
            None => clusters.push(point),
        }
    }

    clusters
}
