// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for model configuration and limit-cycle analysis.
//!
//! One hand-rolled enum, no external error crates. Recoverable numerical
//! clamps during stepping are counted on the trajectory instead of being
//! surfaced as errors.

use std::fmt;

/// Errors produced while configuring or analysing SCN models.
#[derive(Debug)]
pub enum Error {
    /// Illegal model configuration (cell counts, coupling ratio,
    /// parameter vector length, malformed initial state).
    Config(String),
    /// The deterministic period finder failed to reach a stable limit
    /// cycle within its integration budget. Fatal: there is no fallback
    /// period.
    Convergence(String),
}

/// Result type alias for circadia operations.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Convergence(msg) => write!(f, "limit cycle not found: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
