// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON model snapshots.
//!
//! A snapshot is the full set of part records exported from a host model in
//! one go. Coordinates may be in any [`LengthUnit`]; loading normalises them
//! to feet so the engine never sees anything else.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AttributeValue, PartRecord};
use crate::units::LengthUnit;

/// Serializable set of part records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Unit of every coordinate, radius and numeric attribute
    #[serde(default)]
    pub units: LengthUnit,
    pub parts: Vec<PartRecord>,
}

impl ModelSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Self>(json)?.into_feet())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader::<_, Self>(reader)?.into_feet())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Converts every length to feet. Text attributes carry their own units.
    pub fn into_feet(mut self) -> Self {
        let unit = self.units;
        if unit == LengthUnit::Feet {
            return self;
        }

        let scale = |v: f64| unit.to_feet(v);
        for part in &mut self.parts {
            part.outside_radius = part.outside_radius.map(scale);
            for connector in &mut part.connectors {
                connector.origin = connector.origin.map(|o| o.map(scale));
                connector.radius = connector.radius.map(scale);
            }
            for value in part.attributes.values_mut() {
                if let AttributeValue::Length(v) = value {
                    *v = scale(*v);
                }
            }
        }

        self.units = LengthUnit::Feet;
        self
    }
}
