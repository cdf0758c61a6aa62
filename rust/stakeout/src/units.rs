// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length units and free-text size parsing.
//!
//! The engine works in feet throughout. Anything arriving in another unit,
//! either as a snapshot-wide unit or as a free-text size such as `50 mm` or
//! `1-1/2"`, is normalised here.

use serde::{Deserialize, Serialize};

const FEET_PER_METER: f64 = 1.0 / 0.3048;

/// Linear unit of a snapshot or a size value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    #[serde(alias = "ft")]
    Feet,
    #[serde(alias = "in")]
    Inches,
    #[serde(alias = "mm")]
    Millimeters,
    #[serde(alias = "cm")]
    Centimeters,
    #[serde(alias = "m")]
    Meters,
}

impl LengthUnit {
    /// Converts a value in this unit to feet.
    pub fn to_feet(self, value: f64) -> f64 {
        match self {
            LengthUnit::Feet => value,
            LengthUnit::Inches => value / 12.0,
            LengthUnit::Millimeters => value / 1000.0 * FEET_PER_METER,
            LengthUnit::Centimeters => value / 100.0 * FEET_PER_METER,
            LengthUnit::Meters => value * FEET_PER_METER,
        }
    }

    /// Maps a unit suffix (`mm`, `ft`, `'`, `"`, ...) to a unit.
    ///
    /// An empty suffix means inches: nominal pipe sizes are quoted in inches.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix.trim().to_ascii_lowercase().as_str() {
            "" | "in" | "inch" | "inches" | "\"" | "''" => LengthUnit::Inches,
            "ft" | "feet" | "foot" | "'" => LengthUnit::Feet,
            "mm" => LengthUnit::Millimeters,
            "cm" => LengthUnit::Centimeters,
            "m" => LengthUnit::Meters,
            _ => return None,
        };
        Some(unit)
    }
}

/// Parses a free-text length such as `2"`, `50 mm`, `0.5'`, `1-1/2 in` into feet.
///
/// Non-ASCII decoration (diameter signs and the like) is ignored. Reducing
/// sizes (`2"x1"`) yield their leading size; feet-inch text (`1'-6"`) is
/// summed. Returns `None` for text without a leading number or with an
/// unknown suffix.
pub fn parse_length_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .map(|c| if c == '\u{d7}' { 'x' } else { c })
        .filter(char::is_ascii)
        .collect();
    let leading = cleaned.split(['x', 'X']).next()?.trim();

    if let Some((feet, inches)) = leading.split_once('\'') {
        let inches = inches.trim_start_matches(['-', ' ']);
        if !inches.is_empty() {
            let feet = parse_single(&format!("{feet}'"))?;
            return Some(feet + parse_single(inches)?);
        }
    }

    parse_single(leading)
}

fn parse_single(text: &str) -> Option<f64> {
    let cleaned = text.trim();

    let split = cleaned
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' ')))
        .unwrap_or(cleaned.len());
    let (number, suffix) = cleaned.split_at(split);

    let value = parse_number(number.trim())?;
    let unit = LengthUnit::from_suffix(suffix)?;
    let feet = unit.to_feet(value);
    feet.is_finite().then_some(feet)
}

/// Decimal, simple fraction or mixed number (`1 1/2`, `1-1/2`).
fn parse_number(number: &str) -> Option<f64> {
    if number.is_empty() || number.starts_with('-') {
        return None;
    }

    if let Some((whole, fraction)) = number.split_once(|c| c == ' ' || c == '-') {
        let whole: f64 = whole.trim().parse().ok()?;
        return Some(whole + parse_fraction(fraction.trim())?);
    }

    if number.contains('/') {
        return parse_fraction(number);
    }

    number.parse().ok()
}

fn parse_fraction(fraction: &str) -> Option<f64> {
    match fraction.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => fraction.parse().ok(),
    }
}
