// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Riser attachment.
//!
//! A riser is reported where it lands on a run: the nearest run (in plan,
//! unextended) among those a few joints away in the graph.

use rustc_hash::FxHashMap;

use crate::config::StakeoutConfig;
use crate::elevation::bop_elevation;
use crate::graph::AdjacencyGraph;
use crate::line_ops::project_onto_segment;
use crate::segment::{Riser, Segment};
use crate::types::{PartId, PointKind, StakeoutPoint};

/// The run a riser lands on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Index into the run list
    pub run: usize,
    /// Clamped station on that run
    pub station: f64,
    /// Plan distance from the riser anchor to the run
    pub distance: f64,
}

/// Finds the nearest graph-reachable run for a riser.
///
/// Ties keep the earlier run. Returns `None` if no run is reachable, even if
/// the nearest one is outside `riser_tol`.
pub fn nearest_attachment(
    riser: &Riser,
    runs: &[Segment],
    run_index: &FxHashMap<PartId, usize>,
    graph: &AdjacencyGraph,
    max_hops: usize,
) -> Option<Attachment> {
    let mut candidates: Vec<usize> = graph
        .reachable_within(riser.id, max_hops)
        .keys()
        .filter_map(|id| run_index.get(id).copied())
        .collect();
    candidates.sort_unstable();

    candidates
        .into_iter()
        .map(|idx| {
            let run = &runs[idx];
            let (station, distance) = project_onto_segment(&riser.anchor, &run.p0, &run.p1);
            Attachment {
                run: idx,
                station,
                distance,
            }
        })
        .fold(None, |best: Option<Attachment>, cand| match best {
            Some(b) if b.distance <= cand.distance => Some(b),
            _ => Some(cand),
        })
}

/// Emits one point per riser that lands within `riser_tol` of a run.
pub fn resolve_risers(
    risers: &[Riser],
    runs: &[Segment],
    graph: &AdjacencyGraph,
    config: &StakeoutConfig,
) -> Vec<StakeoutPoint> {
    let run_index: FxHashMap<PartId, usize> =
        runs.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

    let mut points = Vec::new();
    for riser in risers {
        let attachment =
            nearest_attachment(riser, runs, &run_index, graph, config.max_riser_hops);

        match attachment {
            Some(att) if att.distance <= config.riser_tol => {
                let z = bop_elevation(&runs[att.run], att.station);
                points.push(StakeoutPoint::new(
                    riser.anchor.x,
                    riser.anchor.y,
                    z,
                    PointKind::Riser,
                ));
            }
            Some(att) => tracing::debug!(
                riser = %riser.id,
                run = %runs[att.run].id,
                distance = att.distance,
                "Nearest run too far from riser"
            ),
            None => tracing::debug!(riser = %riser.id, "No run reachable from riser"),
        }
    }

    tracing::info!(
        risers = risers.len(),
        attached = points.len(),
        "Riser attachment complete"
    );
    points
}
