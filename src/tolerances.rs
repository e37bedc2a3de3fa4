// SPDX-License-Identifier: AGPL-3.0-or-later
//! Centralized validation tolerances with their justification.
//!
//! Every threshold used by the validation binaries and tests lives here.
//! No ad-hoc magic numbers at call sites.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Exact | IEEE 754 f64 | 0.0 for counts, coupling-weight sum |
//! | Machine | f64 arithmetic | 1e-12 for closed-form weights |
//! | Model | Published baseline | 0.5 h for the wild-type period |

/// Operations that must be exact (counts, bitwise-deterministic reruns).
pub const EXACT: f64 = 0.0;

/// Closed-form arithmetic with minimal f64 rounding (coupling weights).
pub const ANALYTICAL_F64: f64 = 1e-12;

/// Published wild-type period of the single Gonze oscillator (hours).
pub const GONZE_PERIOD_H: f64 = 30.27;

/// Allowed deviation of the recovered period from the published value.
///
/// Fixed-step RK4 at `dt = 0.01` with parabolic peak refinement recovers
/// the period to well under half an hour.
pub const PERIOD_TOL_H: f64 = 0.5;

/// Maximum relative spread of successive inter-peak intervals before the
/// trajectory is considered periodic. Above this the period finder
/// reports a convergence failure.
pub const PERIOD_JITTER_REL: f64 = 0.01;

/// Minimum number of peaks after the transient for a period estimate.
pub const PERIOD_MIN_PEAKS: usize = 4;
