// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use pipestake_core::{
    extract_stakeout_points, name_points, write_csv, AdjacencyGraph, Connector, ConnectorRef,
    Error, ModelSnapshot, PartId, PartRecord, PointKind, StakeoutConfig, StakeoutPoint,
};

fn pipe(id: u64, a: [f64; 3], b: [f64; 3], radius: f64) -> PartRecord {
    let axis = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let mut part = PartRecord::new(id);
    part.name = Some(format!("Pipe {id}"));
    part.connectors = vec![
        Connector {
            origin: Some(a),
            direction: Some([-axis[0], -axis[1], -axis[2]]),
            radius: Some(radius),
            joined: Vec::new(),
        },
        Connector {
            origin: Some(b),
            direction: Some(axis),
            radius: Some(radius),
            joined: Vec::new(),
        },
    ];
    part
}

/// A fitting with one connector per joined part.
fn fitting(id: u64, origin: [f64; 3], joins: &[u64]) -> PartRecord {
    let mut part = PartRecord::new(id);
    part.connectors = joins
        .iter()
        .map(|&other| Connector {
            origin: Some(origin),
            joined: vec![ConnectorRef {
                part: PartId(other),
                connector: 0,
            }],
            ..Default::default()
        })
        .collect();
    part
}

fn of_kind(points: &[StakeoutPoint], kind: PointKind) -> Vec<&StakeoutPoint> {
    points.iter().filter(|p| p.kind == kind).collect()
}

fn has_point_near(points: &[StakeoutPoint], x: f64, y: f64) -> bool {
    points.iter().any(|p| p.plan_distance(x, y) < 1e-6)
}

#[test]
fn cross_through_fitting_yields_one_junction() {
    let parts = vec![
        pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [5.0, -5.0, 0.0], [5.0, 5.0, 0.0], 0.05),
        fitting(3, [5.0, 0.0, 0.0], &[1, 2]),
    ];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    let junctions = of_kind(&report.points, PointKind::Junction);

    assert_eq!(junctions.len(), 1);
    let j = junctions[0];
    assert!((j.position.x - 5.0).abs() <= 1.0 / 12.0);
    assert!(j.position.y.abs() <= 1.0 / 12.0);
    assert_relative_eq!(j.position.z, -0.05, epsilon = 1e-9);
    assert_eq!(j.description, "BOP");

    // The four far ends are open
    assert_eq!(of_kind(&report.points, PointKind::OpenEnd).len(), 4);
    assert_eq!(report.stats.junctions, 1);
}

#[test]
fn unrelated_crossing_is_not_a_junction() {
    let parts = vec![
        pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [5.0, -5.0, 0.0], [5.0, 5.0, 0.0], 0.05),
    ];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert!(of_kind(&report.points, PointKind::Junction).is_empty());
    assert!(!has_point_near(&report.points, 5.0, 0.0));
    assert_eq!(report.points.len(), 4);
}

#[test]
fn corner_through_short_stub() {
    // Elbow at the origin; the stub is too short to be a regular run
    let parts = vec![
        pipe(1, [0.25, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [0.0, 0.25, 0.0], [0.0, 0.45, 0.0], 0.05),
        fitting(3, [0.0, 0.0, 0.0], &[1, 2]),
    ];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert_eq!(report.stats.classify.short, 1);

    let junctions = of_kind(&report.points, PointKind::Junction);
    assert_eq!(junctions.len(), 1);
    assert!(junctions[0].plan_distance(0.0, 0.0) < 1e-9);

    // Only the far end of the regular run is open
    let open = of_kind(&report.points, PointKind::OpenEnd);
    assert_eq!(open.len(), 1);
    assert!(open[0].plan_distance(10.0, 0.0) < 1e-9);
}

#[test]
fn joined_end_near_junction_is_not_open() {
    // Branch stops 3" short of the main; the tee fills the gap
    let parts = vec![
        pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [5.0, 0.25, 0.0], [5.0, 8.0, 0.0], 0.05),
        fitting(3, [5.0, 0.0, 0.0], &[1, 2]),
    ];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert_eq!(report.points.len(), 4);
    assert!(has_point_near(&report.points, 5.0, 0.0));
    assert!(!has_point_near(&report.points, 5.0, 0.25));
    assert!(has_point_near(&report.points, 5.0, 8.0));
    assert!(has_point_near(&report.points, 0.0, 0.0));
    assert!(has_point_near(&report.points, 10.0, 0.0));
}

#[test]
fn coupled_ends_merge_to_lower_elevation() {
    let parts = vec![
        pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [10.0, 0.0, -0.1], [20.0, 0.0, -0.1], 0.05),
        fitting(3, [10.0, 0.0, 0.0], &[1, 2]),
    ];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert_eq!(report.points.len(), 3);
    assert_eq!(report.stats.merged, 1);

    let shared = report
        .points
        .iter()
        .find(|p| p.plan_distance(10.0, 0.0) < 1e-9)
        .unwrap();
    assert_relative_eq!(shared.position.z, -0.15, epsilon = 1e-9);
}

#[test]
fn sloped_run_ends_use_vertical_radius() {
    let parts = vec![pipe(1, [0.0, 0.0, 10.0], [10.0, 0.0, 0.0], 0.1)];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    let uz: f64 = -10.0 / 200f64.sqrt();
    let drop = 0.1 * (1.0 - uz * uz).sqrt();

    assert_eq!(report.points.len(), 2);
    assert_relative_eq!(report.points[0].position.z, 10.0 - drop, epsilon = 1e-12);
    assert_relative_eq!(report.points[1].position.z, 0.0 - drop, epsilon = 1e-12);
}

#[test]
fn riser_lands_on_main() {
    let parts = vec![
        pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [5.0, 0.2, 0.1], [5.0, 0.2, 6.0], 0.05),
        fitting(3, [5.0, 0.0, 0.0], &[1, 2]),
    ];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert_eq!(report.stats.classify.risers, 1);

    let risers = of_kind(&report.points, PointKind::Riser);
    assert_eq!(risers.len(), 1);
    assert!(risers[0].plan_distance(5.0, 0.2) < 1e-9);
    assert_relative_eq!(risers[0].position.z, -0.05, epsilon = 1e-9);
}

#[test]
fn fittings_only_is_an_empty_result() {
    let parts = vec![fitting(1, [0.0, 0.0, 0.0], &[2]), fitting(2, [0.0, 0.0, 0.0], &[1])];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.stats.classify.not_run, 2);
}

#[test]
fn unreadable_part_does_not_abort() {
    let mut broken = pipe(2, [5.0, -5.0, 0.0], [5.0, 5.0, 0.0], 0.05);
    broken.connectors[0].origin = None;
    let parts = vec![pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05), broken];

    let report = extract_stakeout_points(&parts, &StakeoutConfig::default()).unwrap();
    assert_eq!(report.stats.classify.missing_geometry, 1);
    assert_eq!(report.points.len(), 2);
}

#[test]
fn invalid_config_is_an_error() {
    let config = StakeoutConfig {
        dedup_xy_tol: f64::NAN,
        ..Default::default()
    };
    let result = extract_stakeout_points(&[], &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn snapshot_graph_is_symmetric() {
    let parts = vec![
        pipe(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 0.05),
        pipe(2, [5.0, -5.0, 0.0], [5.0, 5.0, 0.0], 0.05),
        fitting(3, [5.0, 0.0, 0.0], &[1, 2]),
        fitting(4, [10.0, 0.0, 0.0], &[1, 3]),
    ];
    let graph = AdjacencyGraph::from_parts(&parts);

    assert!(graph.is_symmetric());
    for part in &parts {
        for neighbor in graph.neighbors(part.id) {
            assert!(graph.neighbors(neighbor).any(|n| n == part.id));
        }
    }
}

#[test]
fn snapshot_to_csv() {
    let json = r#"{
        "units": "in",
        "parts": [
            { "id": 1, "connectors": [
                { "origin": [0, 0, 0] },
                { "origin": [120, 0, 0] }
            ], "attributes": { "Size": "1-1/4\"" } }
        ]
    }"#;
    let snapshot = ModelSnapshot::from_json_str(json).unwrap();
    let report =
        pipestake_core::extract_from_snapshot(&snapshot, &StakeoutConfig::default()).unwrap();

    let mut out = Vec::new();
    write_csv(&mut out, &name_points(&report.points)).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    // 1-1/4" OD: radius 0.625" = 0.0521 ft below the centerline
    assert_eq!(
        lines,
        vec![
            "Name,X,Y,Z,Description",
            "P-1,0.0000,0.0000,-0.0521,BOP",
            "P-2,10.0000,0.0000,-0.0521,BOP",
        ]
    );
}
