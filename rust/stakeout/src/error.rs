// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for stakeout extraction.
//!
//! Only whole-operation failures live here. A single unreadable part or a
//! degenerate pair is skipped by the pipeline and never becomes an `Error`.

/// Result type alias for stakeout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a stakeout extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a snapshot or writing a point file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or point JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
