// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction thresholds and tolerances.
//!
//! All lengths are in feet unless the field name says otherwise.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the stakeout extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakeoutConfig {
    /// Run extension per inch of outside diameter
    pub ext_factor: f64,
    /// Extra run extension in inches
    pub ext_extra_in: f64,
    /// Minimum plan length of a regular run
    pub reg_min_plan_len: f64,
    /// Minimum plan length of a short run; anything shorter is discarded
    pub short_min_plan_len: f64,
    /// Maximum plan span of a riser
    pub vert_plan_tol: f64,
    /// Minimum vertical span of a riser
    pub vert_min_z: f64,
    /// Connector axes with a dot product at or below this are colinear
    pub colinear_dot: f64,
    /// Maximum 3D gap between two centerlines at a junction
    pub centerline_tol: f64,
    /// Maximum plan distance from a riser to the run it lands on
    pub riser_tol: f64,
    /// Plan radius around detected points that suppresses open ends
    pub open_end_tol: f64,
    /// Plan tolerance for merging duplicate points
    pub dedup_xy_tol: f64,
    /// Vertical tolerance for merging duplicate points
    pub dedup_z_tol: f64,
    /// Graph hop limit between two runs forming a junction
    pub max_junction_hops: usize,
    /// Graph hop limit from a riser to its run
    pub max_riser_hops: usize,
    /// Radius used when a part reports no size at all
    pub fallback_radius: f64,
    /// Parallel / out-of-range epsilon for line intersection
    pub intersect_epsilon: f64,
    /// Never report a run end whose connector is joined to another part
    pub skip_joined_open_ends: bool,
    /// Run the pairwise intersection phase on the rayon pool
    pub parallel: bool,
}

impl Default for StakeoutConfig {
    fn default() -> Self {
        Self {
            ext_factor: 1.5,
            ext_extra_in: 2.0,
            reg_min_plan_len: 0.5,
            short_min_plan_len: 1.0 / 48.0, // 1/4"
            vert_plan_tol: 0.1,
            vert_min_z: 0.25,
            colinear_dot: -0.999,
            centerline_tol: 1.0 / 12.0, // 1"
            riser_tol: 0.5,             // 6"
            open_end_tol: 1.5,          // 18"
            dedup_xy_tol: 0.25,         // 3"
            dedup_z_tol: 0.25,
            max_junction_hops: 3,
            max_riser_hops: 2,
            fallback_radius: 1.0 / 24.0, // 1" pipe
            intersect_epsilon: 1e-9,
            skip_joined_open_ends: false,
            parallel: true,
        }
    }
}

impl StakeoutConfig {
    /// Defaults overridden by `PIPESTAKE_*` environment variables.
    ///
    /// Unparseable values fall back to the default silently.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `PIPESTAKE_*` name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let lookup = &lookup;
        Self {
            ext_factor: var_or(lookup, "EXT_FACTOR", d.ext_factor),
            ext_extra_in: var_or(lookup, "EXT_EXTRA_IN", d.ext_extra_in),
            reg_min_plan_len: var_or(lookup, "REG_MIN_PLAN_LEN", d.reg_min_plan_len),
            short_min_plan_len: var_or(lookup, "SHORT_MIN_PLAN_LEN", d.short_min_plan_len),
            vert_plan_tol: var_or(lookup, "VERT_PLAN_TOL", d.vert_plan_tol),
            vert_min_z: var_or(lookup, "VERT_MIN_Z", d.vert_min_z),
            colinear_dot: var_or(lookup, "COLINEAR_DOT", d.colinear_dot),
            centerline_tol: var_or(lookup, "CENTERLINE_TOL", d.centerline_tol),
            riser_tol: var_or(lookup, "RISER_TOL", d.riser_tol),
            open_end_tol: var_or(lookup, "OPEN_END_TOL", d.open_end_tol),
            dedup_xy_tol: var_or(lookup, "DEDUP_XY_TOL", d.dedup_xy_tol),
            dedup_z_tol: var_or(lookup, "DEDUP_Z_TOL", d.dedup_z_tol),
            max_junction_hops: var_or(lookup, "MAX_JUNCTION_HOPS", d.max_junction_hops),
            max_riser_hops: var_or(lookup, "MAX_RISER_HOPS", d.max_riser_hops),
            fallback_radius: var_or(lookup, "FALLBACK_RADIUS", d.fallback_radius),
            intersect_epsilon: var_or(lookup, "INTERSECT_EPSILON", d.intersect_epsilon),
            skip_joined_open_ends: var_or(lookup, "SKIP_JOINED_OPEN_ENDS", d.skip_joined_open_ends),
            parallel: var_or(lookup, "PARALLEL", d.parallel),
        }
    }

    /// Extension length in feet for a run of the given outside radius.
    pub fn extension_for_radius(&self, radius: f64) -> f64 {
        let diameter_in = radius * 2.0 * 12.0;
        (self.ext_factor * diameter_in + self.ext_extra_in) / 12.0
    }

    /// Checks that every tolerance is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("ext_factor", self.ext_factor),
            ("ext_extra_in", self.ext_extra_in),
            ("reg_min_plan_len", self.reg_min_plan_len),
            ("short_min_plan_len", self.short_min_plan_len),
            ("vert_plan_tol", self.vert_plan_tol),
            ("vert_min_z", self.vert_min_z),
            ("centerline_tol", self.centerline_tol),
            ("riser_tol", self.riser_tol),
            ("open_end_tol", self.open_end_tol),
            ("dedup_xy_tol", self.dedup_xy_tol),
            ("dedup_z_tol", self.dedup_z_tol),
            ("intersect_epsilon", self.intersect_epsilon),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if !(self.fallback_radius.is_finite() && self.fallback_radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "fallback_radius must be positive, got {}",
                self.fallback_radius
            )));
        }
        if self.short_min_plan_len <= 0.0 {
            return Err(Error::InvalidConfig(
                "short_min_plan_len must be positive".into(),
            ));
        }
        if self.short_min_plan_len > self.reg_min_plan_len {
            return Err(Error::InvalidConfig(format!(
                "short_min_plan_len ({}) exceeds reg_min_plan_len ({})",
                self.short_min_plan_len, self.reg_min_plan_len
            )));
        }
        if !(-1.0..=1.0).contains(&self.colinear_dot) {
            return Err(Error::InvalidConfig(format!(
                "colinear_dot must lie in [-1, 1], got {}",
                self.colinear_dot
            )));
        }

        Ok(())
    }
}

fn var_or<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, suffix: &str, default: T) -> T {
    lookup(&format!("PIPESTAKE_{suffix}"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
