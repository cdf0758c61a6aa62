// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core input and output types.
//!
//! Part records are the hand-off from whatever extracted geometry out of the
//! host model. Lengths are in feet by the time the engine sees them.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Opaque identity of a fabrication part, used as the graph node key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub u64);

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a connector owned by another part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorRef {
    pub part: PartId,
    pub connector: usize,
}

/// A directional connector on a part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connector {
    /// Connector origin. `None` when the host could not report it.
    #[serde(default)]
    pub origin: Option<[f64; 3]>,
    /// Outward axis direction, not necessarily normalised.
    #[serde(default)]
    pub direction: Option<[f64; 3]>,
    /// Outside radius at this connector.
    #[serde(default)]
    pub radius: Option<f64>,
    /// Connectors on other parts this one is physically joined to.
    #[serde(default)]
    pub joined: Vec<ConnectorRef>,
}

impl Connector {
    /// Origin as a point, if present and finite.
    pub fn point(&self) -> Option<Point3<f64>> {
        let [x, y, z] = self.origin?;
        (x.is_finite() && y.is_finite() && z.is_finite()).then(|| Point3::new(x, y, z))
    }

    pub fn is_joined(&self) -> bool {
        !self.joined.is_empty()
    }
}

/// A size attribute value: a length in feet, or free text with a unit suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Length(f64),
    Text(String),
}

/// One fabrication part (pipe, fitting, coupling, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: PartId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    /// Outside radius reported directly by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outside_radius: Option<f64>,
    /// Named dimension attributes (`OutsideDiameter`, `Size`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl PartRecord {
    pub fn new(id: u64) -> Self {
        Self {
            id: PartId(id),
            name: None,
            connectors: Vec::new(),
            outside_radius: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// Which detection phase produced a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKind {
    /// Two runs meeting at a fitting.
    Junction,
    /// A riser landing on a run.
    Riser,
    /// A run end with nothing attached nearby.
    OpenEnd,
}

/// Label written for every point: bottom of pipe.
pub const BOP: &str = "BOP";

/// A point to be staked out in the field.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeoutPoint {
    pub position: Point3<f64>,
    pub description: String,
    pub kind: PointKind,
}

impl StakeoutPoint {
    pub fn new(x: f64, y: f64, z: f64, kind: PointKind) -> Self {
        Self {
            position: Point3::new(x, y, z),
            description: BOP.to_string(),
            kind,
        }
    }

    /// Plan distance to another point.
    pub fn plan_distance(&self, x: f64, y: f64) -> f64 {
        (self.position.x - x).hypot(self.position.y - y)
    }
}
