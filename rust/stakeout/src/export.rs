// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point file export (CSV and JSON).
//!
//! The CSV layout is what survey controllers import directly:
//! `Name,X,Y,Z,Description`, one row per point, `.` as decimal separator.

use std::borrow::Cow;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::StakeoutPoint;

/// CSV header row.
pub const CSV_HEADER: &str = "Name,X,Y,Z,Description";

/// A point with its generated name, ready to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub description: String,
}

/// Names points `P-1`, `P-2`, ... in order.
pub fn name_points(points: &[StakeoutPoint]) -> Vec<NamedPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| NamedPoint {
            name: format!("P-{}", i + 1),
            x: p.position.x,
            y: p.position.y,
            z: p.position.z,
            description: p.description.clone(),
        })
        .collect()
}

/// Writes named points as CSV.
pub fn write_csv<W: Write>(mut writer: W, points: &[NamedPoint]) -> Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for p in points {
        writeln!(
            writer,
            "{},{:.4},{:.4},{:.4},{}",
            csv_field(&p.name),
            p.x,
            p.y,
            p.z,
            csv_field(&p.description)
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes named points as a pretty JSON array.
pub fn write_json<W: Write>(mut writer: W, points: &[NamedPoint]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, points)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Quotes a field only if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
