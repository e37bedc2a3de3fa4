// SPDX-License-Identifier: AGPL-3.0-or-later
//! Coupled network model: resolved configuration, mean-field coupling,
//! and the per-cell kinetic rates shared by both integration modes.
//!
//! [`ScnModel::new`] validates an [`ScnConfig`] once and freezes every
//! derived quantity (coupling weights, knockout gates, per-cell Stage-1
//! degradation rates, `K1^n`). The deterministic and stochastic drivers
//! both consume [`ScnModel::cell_rates`], so a knockout or coupling
//! change applies identically in the two modes.

use crate::error::Result;
use crate::params::{GonzeParams, BMALKO_LEAK};

use super::cell::{CellCounts, CellType, NetworkLayout, VAR_OUT, VAR_X, VAR_Y, VAR_Z};
use super::config::{InitialState, ScnConfig};
use super::rng::Lcg64;
use super::trajectory::Trajectory;
use super::{ode, ssa};

/// Maximum number of variables per cell; `cell_rates` always returns
/// this many (production, degradation) pairs, zero-padded for NAV.
pub const MAX_CELL_VARS: usize = 4;

/// Coupling weights `(ar, vr)` for a given AVP:VIP strength ratio.
///
/// `ar = kav / (kav + 1)`; `vr` is computed as `1 - ar` so the pair
/// sums to exactly 1.0 in floating point for every `kav`.
#[must_use]
pub fn coupling_weights(kav: f64) -> (f64, f64) {
    let ar = kav / (kav + 1.0);
    (ar, 1.0 - ar)
}

/// A validated, immutable network model ready to simulate.
#[derive(Debug, Clone)]
pub struct ScnModel {
    config: ScnConfig,
    layout: NetworkLayout,
    ar: f64,
    vr: f64,
    k1n: f64,
    /// Stage-1 production scale per population (Bmal1 gate).
    avp_bmalko: f64,
    vip_bmalko: f64,
    /// Output production gate per population.
    avp_ko: f64,
    vip_ko: f64,
    /// Resolved Stage-1 degradation rate per global cell index.
    p3: Vec<f64>,
}

impl ScnModel {
    /// Resolve a configuration into a runnable model.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the configuration fails
    /// [`ScnConfig::validate`].
    pub fn new(config: ScnConfig) -> Result<Self> {
        config.validate()?;
        let layout = NetworkLayout::new(config.cells);
        let (ar, vr) = coupling_weights(config.kav);
        let k1n = config.params.k1.powf(config.params.n);

        let bmalko_avp = config.bmalko.is_some_and(|k| k.targets_avp());
        let bmalko_vip = config.bmalko.is_some_and(|k| k.targets_vip());
        let ko_avp = config.ko.is_some_and(|k| k.targets_avp());
        let ko_vip = config.ko.is_some_and(|k| k.targets_vip());

        let p3 = config
            .p3
            .clone()
            .unwrap_or_else(|| vec![config.params.v2; config.cells.total_cells()]);

        Ok(Self {
            layout,
            ar,
            vr,
            k1n,
            avp_bmalko: if bmalko_avp { BMALKO_LEAK } else { 1.0 },
            vip_bmalko: if bmalko_vip { BMALKO_LEAK } else { 1.0 },
            avp_ko: if ko_avp { 0.0 } else { 1.0 },
            vip_ko: if ko_vip { 0.0 } else { 1.0 },
            p3,
            config,
        })
    }

    /// The configuration this model was built from.
    #[must_use]
    pub const fn config(&self) -> &ScnConfig {
        &self.config
    }

    /// State-buffer layout.
    #[must_use]
    pub const fn layout(&self) -> &NetworkLayout {
        &self.layout
    }

    /// Coupling weights `(ar, vr)` resolved from `kav`.
    #[must_use]
    pub const fn weights(&self) -> (f64, f64) {
        (self.ar, self.vr)
    }

    /// Bmal1 gate on Stage-1 production for one population.
    #[must_use]
    pub const fn stage1_scale(&self, ty: CellType) -> f64 {
        match ty {
            CellType::Avp => self.avp_bmalko,
            CellType::Vip => self.vip_bmalko,
            CellType::Nav => 1.0,
        }
    }

    /// Gate on the output production stage for one population. NAV has
    /// no output stage; its gate is 0.
    #[must_use]
    pub const fn output_gate(&self, ty: CellType) -> f64 {
        match ty {
            CellType::Avp => self.avp_bmalko * self.avp_ko,
            CellType::Vip => self.vip_ko,
            CellType::Nav => 0.0,
        }
    }

    /// Mean-field paracrine signal `c = ar·mean(A) + vr·mean(V)`.
    ///
    /// An empty population contributes exactly 0 rather than a 0/0 NaN.
    #[must_use]
    pub fn coupling(&self, state: &[f64]) -> f64 {
        let counts = self.layout.counts();
        let mut c = 0.0;
        if counts.avp > 0 {
            let start = self.layout.block_start(CellType::Avp);
            let mut sum = 0.0;
            for i in 0..counts.avp {
                sum += state[start + 4 * i + VAR_OUT];
            }
            #[allow(clippy::cast_precision_loss)]
            let mean = sum / counts.avp as f64;
            c += self.ar * mean;
        }
        if counts.vip > 0 {
            let start = self.layout.block_start(CellType::Vip);
            let mut sum = 0.0;
            for i in 0..counts.vip {
                sum += state[start + 4 * i + VAR_OUT];
            }
            #[allow(clippy::cast_precision_loss)]
            let mean = sum / counts.vip as f64;
            c += self.vr * mean;
        }
        c
    }

    /// Production and degradation rates for one cell given the coupling
    /// signal `c`. `y` is the cell's own variable slice; the returned
    /// array holds `[production, degradation]` per variable, zero-padded
    /// for the NAV output slot.
    ///
    /// Both integration modes build on these rates: the ODE uses
    /// `production - degradation`, the SSA treats each as a separate
    /// birth or death channel.
    #[must_use]
    pub fn cell_rates(
        &self,
        ty: CellType,
        global_cell: usize,
        y: &[f64],
        c: f64,
    ) -> [[f64; 2]; MAX_CELL_VARS] {
        let p = &self.config.params;
        let x = y[VAR_X];
        let yy = y[VAR_Y];
        let z = y[VAR_Z];

        let hill = self.stage1_scale(ty) * p.v1 * self.k1n / (self.k1n + z.max(0.0).powf(p.n));
        let coupling_input = p.vc * p.k * c / (p.kc + p.k * c);
        let mut rates = [[0.0; 2]; MAX_CELL_VARS];
        rates[VAR_X] = [
            hill + coupling_input,
            self.p3[global_cell] * x / (p.k2 + x),
        ];
        rates[VAR_Y] = [p.k3 * x, p.v4 * yy / (p.k4 + yy)];
        rates[VAR_Z] = [p.k5 * yy, p.v6 * z / (p.k6 + z)];
        if ty.has_output() {
            let out = y[VAR_OUT];
            rates[VAR_OUT] = [
                self.output_gate(ty) * p.k7 * x,
                p.v8 * out / (p.k8 + out),
            ];
        }
        rates
    }

    /// Full network time derivative with a single coupling evaluation.
    pub fn rhs(&self, state: &[f64], dydt: &mut [f64]) {
        let c = self.coupling(state);
        for (ty, idx, offset) in self.layout.cells() {
            let global = self.layout.global_cell_index(ty, idx);
            let n = ty.n_vars();
            let rates = self.cell_rates(ty, global, &state[offset..offset + n], c);
            for (v, slot) in dydt[offset..offset + n].iter_mut().enumerate() {
                *slot = rates[v][0] - rates[v][1];
            }
        }
    }

    /// Materialize the initial state vector, drawing random phases from
    /// `rng` when configured.
    #[must_use]
    pub fn initial_state(&self, rng: &mut Lcg64) -> Vec<f64> {
        match &self.config.init {
            InitialState::Explicit(y0) => y0.clone(),
            InitialState::RandomPhase(lc) => {
                let mut y0 = vec![0.0; self.layout.n_states()];
                for (ty, _, offset) in self.layout.cells() {
                    let sample = lc.random_phase(rng);
                    y0[offset..offset + ty.n_vars()]
                        .copy_from_slice(&sample[..ty.n_vars()]);
                }
                y0
            }
        }
    }

    /// Run the stochastic simulation for this configuration.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the initial-state setup.
    pub fn run(&self) -> Result<Trajectory> {
        let mut rng = Lcg64::new(self.config.seed);
        let y0 = self.initial_state(&mut rng);
        Ok(ssa::simulate(self, &y0, &mut rng))
    }

    /// Run the deterministic (RK4) simulation for this configuration.
    ///
    /// The seed still controls the random-phase initial draw, so a
    /// deterministic and a stochastic run of the same configuration
    /// start from the same state.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the initial-state setup.
    pub fn run_deterministic(&self) -> Result<Trajectory> {
        let mut rng = Lcg64::new(self.config.seed);
        let y0 = self.initial_state(&mut rng);
        Ok(ode::integrate(self, &y0))
    }
}

/// Convenience: population sizes for an `avp`/`vip` split of a fixed
/// AVP+VIP total, NAV unchanged.
#[must_use]
pub const fn counts_with_avp(avp: usize, av_total: usize, nav: usize) -> CellCounts {
    CellCounts {
        avp,
        vip: av_total - avp,
        nav,
    }
}
