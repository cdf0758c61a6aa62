// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Junction detection between runs.
//!
//! Each run is extended past both ends so that runs meeting through a fitting
//! (whose own body is not a run) still cross in plan. A plan crossing of the
//! extended spans is mapped back to stations on the true runs and accepted
//! only if
//!
//! - the two centerlines are within `centerline_tol` of each other in 3D at
//!   those stations, and
//! - the runs are at most `max_junction_hops` joints apart in the graph.
//!
//! Proximity alone would accept unrelated systems crossing over each other;
//! connectivity alone would accept joints reported far from where they are.

use nalgebra::Point2;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::StakeoutConfig;
use crate::elevation::bop_elevation;
use crate::graph::AdjacencyGraph;
use crate::line_ops::segment_intersection;
use crate::segment::Segment;
use crate::types::{PartId, PointKind, StakeoutPoint};

/// Plan crossing of two extended runs, mapped back to true stations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point2<f64>,
    /// Station on the first run (may lie outside `[0, 1]`)
    pub ta: f64,
    /// Station on the second run
    pub tb: f64,
    /// 3D distance between the two centerline points
    pub gap: f64,
}

/// Crosses the extended plan spans of two runs.
pub fn extended_crossing(a: &Segment, b: &Segment, eps: f64) -> Option<Crossing> {
    let hit = segment_intersection(&a.e0, &a.e1, &b.e0, &b.e1, eps)?;

    let ta = a.true_station(hit.ta);
    let tb = b.true_station(hit.tb);
    let gap = (a.point_at(ta) - b.point_at(tb)).norm();

    Some(Crossing {
        point: hit.point,
        ta,
        tb,
        gap,
    })
}

/// Junction point for a pair of runs, if both tests pass.
///
/// `reach_a` holds the parts within the hop limit of `a`.
fn junction_point(
    a: &Segment,
    b: &Segment,
    reach_a: &FxHashMap<PartId, usize>,
    config: &StakeoutConfig,
) -> Option<StakeoutPoint> {
    let crossing = extended_crossing(a, b, config.intersect_epsilon)?;

    if crossing.gap > config.centerline_tol {
        tracing::trace!(a = %a.id, b = %b.id, gap = crossing.gap, "Centerlines too far apart");
        return None;
    }
    if !reach_a.contains_key(&b.id) {
        tracing::debug!(
            a = %a.id,
            b = %b.id,
            x = crossing.point.x,
            y = crossing.point.y,
            "Rejected crossing between unconnected runs"
        );
        return None;
    }

    let z = bop_elevation(a, crossing.ta).min(bop_elevation(b, crossing.tb));
    Some(StakeoutPoint::new(
        crossing.point.x,
        crossing.point.y,
        z,
        PointKind::Junction,
    ))
}

/// Finds junction points over every unordered pair of runs.
///
/// Output follows pair order `(0,1), (0,2), ..., (1,2), ...` whether or not
/// the pairs were evaluated in parallel.
pub fn detect_junctions(
    runs: &[Segment],
    graph: &AdjacencyGraph,
    config: &StakeoutConfig,
) -> Vec<StakeoutPoint> {
    let reach: Vec<FxHashMap<PartId, usize>> = runs
        .iter()
        .map(|run| graph.reachable_within(run.id, config.max_junction_hops))
        .collect();

    let n = runs.len();
    let reach = reach.as_slice();
    let row = move |i: usize| {
        ((i + 1)..n).filter_map(move |j| junction_point(&runs[i], &runs[j], &reach[i], config))
    };

    let points: Vec<StakeoutPoint> = if config.parallel {
        (0..n).into_par_iter().flat_map_iter(row).collect()
    } else {
        (0..n).flat_map(row).collect()
    };

    tracing::info!(
        runs = runs.len(),
        pairs = n * n.saturating_sub(1) / 2,
        junctions = points.len(),
        "Junction detection complete"
    );
    points
}
