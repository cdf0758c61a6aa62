// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outside radius resolution.
//!
//! Hosts report pipe size inconsistently: on the connectors, as a direct
//! radius, or only as a named dimension attribute. The strategies below are
//! tried in order and the first positive value wins.

use crate::types::{AttributeValue, PartRecord};
use crate::units::parse_length_text;

/// Size attributes holding an outside diameter, in lookup order.
pub const DIAMETER_ATTRIBUTES: [&str; 3] = ["OutsideDiameter", "Overall Size", "Size"];

/// Which lookup produced the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusSource {
    Connector,
    Reported,
    Attribute(&'static str),
    Fallback,
}

type Strategy = fn(&PartRecord) -> Option<f64>;

const STRATEGIES: [(RadiusSource, Strategy); 5] = [
    (RadiusSource::Connector, largest_connector_radius),
    (RadiusSource::Reported, reported_radius),
    (RadiusSource::Attribute(DIAMETER_ATTRIBUTES[0]), outside_diameter_attribute),
    (RadiusSource::Attribute(DIAMETER_ATTRIBUTES[1]), overall_size_attribute),
    (RadiusSource::Attribute(DIAMETER_ATTRIBUTES[2]), size_attribute),
];

/// Resolves a part's outside radius in feet. Always positive.
pub fn resolve_outside_radius(part: &PartRecord, fallback: f64) -> (f64, RadiusSource) {
    STRATEGIES
        .iter()
        .find_map(|(source, strategy)| strategy(part).filter(|r| usable(*r)).map(|r| (r, *source)))
        .unwrap_or((fallback, RadiusSource::Fallback))
}

fn usable(radius: f64) -> bool {
    radius.is_finite() && radius > 0.0
}

fn largest_connector_radius(part: &PartRecord) -> Option<f64> {
    part.connectors
        .iter()
        .filter_map(|c| c.radius)
        .filter(|r| usable(*r))
        .reduce(f64::max)
}

fn reported_radius(part: &PartRecord) -> Option<f64> {
    part.outside_radius
}

fn attribute_radius(part: &PartRecord, name: &str) -> Option<f64> {
    let diameter = match part.attributes.get(name)? {
        AttributeValue::Length(feet) => *feet,
        AttributeValue::Text(text) => match parse_length_text(text) {
            Some(feet) => feet,
            None => {
                tracing::debug!(
                    part = %part.id,
                    attribute = name,
                    text = %text,
                    "Unreadable size text"
                );
                return None;
            }
        },
    };
    Some(diameter / 2.0)
}

fn outside_diameter_attribute(part: &PartRecord) -> Option<f64> {
    attribute_radius(part, DIAMETER_ATTRIBUTES[0])
}

fn overall_size_attribute(part: &PartRecord) -> Option<f64> {
    attribute_radius(part, DIAMETER_ATTRIBUTES[1])
}

fn size_attribute(part: &PartRecord) -> Option<f64> {
    attribute_radius(part, DIAMETER_ATTRIBUTES[2])
}
