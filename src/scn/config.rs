// SPDX-License-Identifier: AGPL-3.0-or-later
//! Model configuration: populations, coupling ratio, perturbations,
//! initial-state policy, and run horizon.
//!
//! A configuration is an immutable value handed to
//! [`ScnModel::new`](super::network::ScnModel::new); there is no
//! process-wide parameter state.

use crate::error::{Error, Result};
use crate::params::GonzeParams;

use super::cell::CellCounts;
use super::limit_cycle::LimitCycle;

/// Which population(s) a simulated knockout targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knockout {
    /// AVP cells only.
    Avp,
    /// VIP cells only.
    Vip,
    /// Both AVP and VIP cells.
    AvpVip,
}

impl Knockout {
    /// Whether the AVP population is targeted.
    #[must_use]
    pub const fn targets_avp(self) -> bool {
        matches!(self, Self::Avp | Self::AvpVip)
    }

    /// Whether the VIP population is targeted.
    #[must_use]
    pub const fn targets_vip(self) -> bool {
        matches!(self, Self::Vip | Self::AvpVip)
    }
}

/// How the network's initial state is obtained.
#[derive(Debug, Clone)]
pub enum InitialState {
    /// Explicit concentrations, length = total state count, all ≥ 0.
    Explicit(Vec<f64>),
    /// Each cell starts at a uniformly random phase of the deterministic
    /// limit cycle, drawn from the run's seed. AVP and VIP cells take the
    /// full 4-variable sample; NAV cells take the first three.
    RandomPhase(LimitCycle),
}

/// Immutable configuration for one simulation run.
#[derive(Debug, Clone)]
pub struct ScnConfig {
    /// Shared kinetic constants.
    pub params: GonzeParams,
    /// Population sizes.
    pub cells: CellCounts,
    /// AVP:VIP relative coupling strength ratio (> 0).
    pub kav: f64,
    /// Bmal1 knockout: attenuates the targeted population's Stage-1
    /// production by [`crate::params::BMALKO_LEAK`] (leaky, never zero).
    pub bmalko: Option<Knockout>,
    /// Output knockout: zeroes the targeted population's output
    /// production term.
    pub ko: Option<Knockout>,
    /// Per-cell Stage-1 degradation override (length = total cells,
    /// global cell order). `None` means `v2` for every cell.
    pub p3: Option<Vec<f64>>,
    /// System size Ω converting concentrations to molecule counts in
    /// stochastic mode.
    pub volume: f64,
    /// Simulation horizon (hours).
    pub t_end: f64,
    /// Reporting interval (hours); decoupled from internal stepping.
    pub report_dt: f64,
    /// Internal RK4 step for deterministic mode (hours).
    pub ode_dt: f64,
    /// Seed controlling the random-phase draw and all stochastic draws.
    pub seed: u64,
    /// Initial-state policy.
    pub init: InitialState,
}

impl ScnConfig {
    /// Configuration with experiment defaults: `kav = 1`, no knockouts,
    /// Ω = 1000, 180 h horizon reported every 0.5 h, seed 0.
    #[must_use]
    pub fn new(params: GonzeParams, cells: CellCounts, init: InitialState) -> Self {
        Self {
            params,
            cells,
            kav: 1.0,
            bmalko: None,
            ko: None,
            p3: None,
            volume: 1000.0,
            t_end: 180.0,
            report_dt: 0.5,
            ode_dt: 0.01,
            seed: 0,
            init,
        }
    }

    /// Validate every field; called by `ScnModel::new`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on non-positive `kav`, zero-cell
    /// networks, malformed `p3` or explicit initial-state vectors, or
    /// non-positive time/volume settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.kav.is_finite() && self.kav > 0.0) {
            return Err(Error::Config(format!(
                "kav must be a positive finite ratio, got {}",
                self.kav
            )));
        }
        if self.cells.total_cells() == 0 {
            return Err(Error::Config("network must contain at least one cell".into()));
        }
        if !(self.volume.is_finite() && self.volume > 0.0) {
            return Err(Error::Config(format!(
                "volume must be positive, got {}",
                self.volume
            )));
        }
        if !(self.t_end.is_finite() && self.t_end > 0.0) {
            return Err(Error::Config(format!(
                "t_end must be positive, got {}",
                self.t_end
            )));
        }
        if !(self.report_dt.is_finite() && self.report_dt > 0.0 && self.report_dt <= self.t_end) {
            return Err(Error::Config(format!(
                "report_dt must be in (0, t_end], got {}",
                self.report_dt
            )));
        }
        if !(self.ode_dt.is_finite() && self.ode_dt > 0.0) {
            return Err(Error::Config(format!(
                "ode_dt must be positive, got {}",
                self.ode_dt
            )));
        }
        if let Some(p3) = &self.p3 {
            if p3.len() != self.cells.total_cells() {
                return Err(Error::Config(format!(
                    "p3 override must have one entry per cell ({}), got {}",
                    self.cells.total_cells(),
                    p3.len()
                )));
            }
            if p3.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(Error::Config("p3 entries must be finite and non-negative".into()));
            }
        }
        if let InitialState::Explicit(y0) = &self.init {
            if y0.len() != self.cells.total_states() {
                return Err(Error::Config(format!(
                    "initial state must have {} entries, got {}",
                    self.cells.total_states(),
                    y0.len()
                )));
            }
            if y0.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(Error::Config(
                    "initial concentrations must be finite and non-negative".into(),
                ));
            }
        }
        Ok(())
    }
}
