// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PipeStake Core
//!
//! Stakeout point extraction for piping and fabrication models.
//!
//! Given the parts of a pipe network (straight runs, fittings, risers) and
//! how their connectors are joined, this crate finds the minimal set of
//! points a field crew needs to lay the network out:
//!
//! 1. **Junctions**: runs meeting through a fitting, found by crossing their
//!    extended plan lines and confirming the match in 3D and in the
//!    connectivity graph
//! 2. **Riser landings**: where a vertical post meets the run it sits on
//! 3. **Open ends**: run ends with nothing attached
//!
//! Every point carries a bottom-of-pipe elevation corrected for slope, and
//! near-duplicates are merged before the list is returned.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pipestake_core::{extract_stakeout_points, ModelSnapshot, StakeoutConfig};
//!
//! let snapshot = ModelSnapshot::from_path("model.json")?;
//! let report = extract_stakeout_points(&snapshot.parts, &StakeoutConfig::default())?;
//!
//! let named = pipestake_core::export::name_points(&report.points);
//! pipestake_core::export::write_csv(std::io::stdout(), &named)?;
//! ```

pub mod classify;
pub mod config;
pub mod dedup;
pub mod elevation;
pub mod error;
pub mod export;
pub mod graph;
pub mod intersect;
pub mod line_ops;
pub mod open_end;
pub mod radius;
pub mod riser;
pub mod segment;
pub mod snapshot;
pub mod types;
pub mod units;

// Re-export commonly used types and functions
pub use classify::{classify_parts, ClassifyStats};
pub use config::StakeoutConfig;
pub use dedup::deduplicate;
pub use elevation::bop_elevation;
pub use error::{Error, Result};
pub use export::{name_points, write_csv, write_json, NamedPoint};
pub use graph::AdjacencyGraph;
pub use intersect::detect_junctions;
pub use open_end::detect_open_ends;
pub use riser::resolve_risers;
pub use segment::{Riser, RunKind, Segment};
pub use snapshot::ModelSnapshot;
pub use types::{
    AttributeValue, Connector, ConnectorRef, PartId, PartRecord, PointKind, StakeoutPoint,
};
pub use units::{parse_length_text, LengthUnit};

/// Counts from one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakeoutStats {
    pub parts: usize,
    pub classify: ClassifyStats,
    pub junctions: usize,
    pub riser_points: usize,
    pub open_ends: usize,
    /// Raw points absorbed into an earlier point
    pub merged: usize,
}

/// Final point list plus run statistics.
#[derive(Debug, Clone, Default)]
pub struct StakeoutReport {
    pub points: Vec<StakeoutPoint>,
    pub stats: StakeoutStats,
}

impl StakeoutReport {
    /// True when nothing worth staking was found. Not an error.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Runs the full extraction pipeline over a set of part records.
///
/// Steps:
/// 1. Build the connectivity graph from connector joins
/// 2. Classify parts into regular runs, short runs and risers
/// 3. Detect junctions and riser landings (independent of each other)
/// 4. Detect open ends not covered by step 3
/// 5. Merge near-duplicates
///
/// Unusable parts are skipped. An input with no runs or risers yields an
/// empty report; only an invalid configuration is an error.
pub fn extract_stakeout_points(
    parts: &[PartRecord],
    config: &StakeoutConfig,
) -> Result<StakeoutReport> {
    config.validate()?;

    let mut stats = StakeoutStats {
        parts: parts.len(),
        ..Default::default()
    };

    let graph = AdjacencyGraph::from_parts(parts);
    debug_assert!(graph.is_symmetric());
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built connectivity graph"
    );

    let classified = classify_parts(parts, config);
    stats.classify = classified.stats;
    tracing::info!(
        parts = parts.len(),
        regular = classified.stats.regular,
        short = classified.stats.short,
        risers = classified.stats.risers,
        skipped = classified.stats.missing_geometry,
        "Classified parts"
    );

    if classified.is_empty() {
        tracing::info!("No qualifying runs or risers");
        return Ok(StakeoutReport {
            points: Vec::new(),
            stats,
        });
    }

    let junctions = detect_junctions(&classified.runs, &graph, config);
    let riser_points = resolve_risers(&classified.risers, &classified.runs, &graph, config);
    stats.junctions = junctions.len();
    stats.riser_points = riser_points.len();

    let mut detected = junctions;
    detected.extend(riser_points);

    let open_ends = detect_open_ends(&classified.runs, &detected, config);
    stats.open_ends = open_ends.len();

    let mut raw = detected;
    raw.extend(open_ends);
    let raw_count = raw.len();

    let points = deduplicate(raw, config.dedup_xy_tol, config.dedup_z_tol);
    stats.merged = raw_count - points.len();

    tracing::info!(
        points = points.len(),
        merged = stats.merged,
        "Stakeout extraction complete"
    );

    Ok(StakeoutReport { points, stats })
}

/// Convenience wrapper over [`extract_stakeout_points`] for a loaded snapshot.
pub fn extract_from_snapshot(
    snapshot: &ModelSnapshot,
    config: &StakeoutConfig,
) -> Result<StakeoutReport> {
    extract_stakeout_points(&snapshot.parts, config)
}
