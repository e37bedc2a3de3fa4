// SPDX-License-Identifier: AGPL-3.0-or-later
//! Deterministic single-oscillator period finder and limit-cycle sampler.
//!
//! Integrates one uncoupled Gonze cell (4 states, its own output feeding
//! its coupling input) to a stable limit cycle, extracts the period from
//! the inter-peak intervals of X after a transient, and stores one period
//! of the cycle for phase sampling. The multicellular model draws
//! random-phase initial conditions from this cycle.
//!
//! Non-convergence (too few peaks, drifting intervals, or a decayed
//! amplitude) is a fatal [`Error::Convergence`]; there is no fallback
//! period.

use crate::error::{Error, Result};
use crate::params::GonzeParams;
use crate::tolerances;

use super::rng::Lcg64;

/// Number of state variables of the single reference oscillator.
pub const LC_VARS: usize = 4;

/// Minimum peak-to-trough X amplitude for the trajectory to count as
/// oscillating rather than settled at a fixed point.
const MIN_AMPLITUDE: f64 = 0.01;

/// Integration settings for the period finder.
#[derive(Debug, Clone)]
pub struct PeriodOptions {
    /// Total integration time (hours).
    pub t_end: f64,
    /// Initial transient to discard before peak detection (hours).
    pub transient: f64,
    /// RK4 step (hours); also the stored limit-cycle sample spacing.
    pub dt: f64,
}

impl Default for PeriodOptions {
    fn default() -> Self {
        Self {
            t_end: 500.0,
            transient: 250.0,
            dt: 0.01,
        }
    }
}

/// One period of the converged single-cell limit cycle.
///
/// Samples are spaced `dt` apart starting at phase 0 (an X peak);
/// [`state_at`](Self::state_at) wraps and interpolates linearly.
#[derive(Debug, Clone)]
pub struct LimitCycle {
    period: f64,
    dt: f64,
    samples: Vec<[f64; LC_VARS]>,
}

/// Right-hand side of the single self-coupled oscillator.
///
/// Identical kinetics to one AVP cell of the full network, with the
/// mean-field signal replaced by the cell's own output A.
fn single_cell_rhs(p: &GonzeParams, y: &[f64; LC_VARS]) -> [f64; LC_VARS] {
    let [x, yy, z, a] = *y;
    let k1n = p.k1.powf(p.n);
    let coupling_input = p.vc * p.k * a / (p.kc + p.k * a);
    [
        p.v1 * k1n / (k1n + z.max(0.0).powf(p.n)) - p.v2 * x / (p.k2 + x) + coupling_input,
        p.k3 * x - p.v4 * yy / (p.k4 + yy),
        p.k5 * yy - p.v6 * z / (p.k6 + z),
        p.k7 * x - p.v8 * a / (p.k8 + a),
    ]
}

/// One fixed-size RK4 step with a non-negativity clamp.
fn rk4_step(p: &GonzeParams, y: &[f64; LC_VARS], dt: f64) -> [f64; LC_VARS] {
    let half = 0.5 * dt;
    let k1 = single_cell_rhs(p, y);
    let mut y2 = *y;
    for i in 0..LC_VARS {
        y2[i] = half.mul_add(k1[i], y[i]);
    }
    let k2 = single_cell_rhs(p, &y2);
    let mut y3 = *y;
    for i in 0..LC_VARS {
        y3[i] = half.mul_add(k2[i], y[i]);
    }
    let k3 = single_cell_rhs(p, &y3);
    let mut y4 = *y;
    for i in 0..LC_VARS {
        y4[i] = dt.mul_add(k3[i], y[i]);
    }
    let k4 = single_cell_rhs(p, &y4);
    let sixth = dt / 6.0;
    let mut out = *y;
    for i in 0..LC_VARS {
        let slope = 2.0f64.mul_add(k2[i] + k3[i], k1[i] + k4[i]);
        out[i] = sixth.mul_add(slope, y[i]).max(0.0);
    }
    out
}

impl LimitCycle {
    /// Find the limit cycle of the single oscillator.
    ///
    /// Integrates from `y0 = (1, 1, 1, 1)`, discards the transient, and
    /// requires at least [`tolerances::PERIOD_MIN_PEAKS`] X peaks whose
    /// spacing varies by less than [`tolerances::PERIOD_JITTER_REL`]
    /// relative to the mean.
    ///
    /// # Errors
    ///
    /// [`Error::Convergence`] when the trajectory has not settled onto a
    /// periodic orbit within the integration budget.
    pub fn find(params: &GonzeParams, opts: &PeriodOptions) -> Result<Self> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_steps = (opts.t_end / opts.dt).ceil() as usize;
        let mut states = Vec::with_capacity(n_steps + 1);
        let mut y = [1.0; LC_VARS];
        states.push(y);
        for _ in 0..n_steps {
            y = rk4_step(params, &y, opts.dt);
            states.push(y);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let skip = (opts.transient / opts.dt).ceil() as usize;
        if skip + 2 >= states.len() {
            return Err(Error::Convergence(
                "transient longer than the integration horizon".into(),
            ));
        }

        let x_tail: Vec<f64> = states[skip..].iter().map(|s| s[0]).collect();
        let lo = x_tail.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = x_tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi - lo < MIN_AMPLITUDE {
            return Err(Error::Convergence(format!(
                "X amplitude {:.4} after transient; oscillation has decayed",
                hi - lo
            )));
        }

        // Strict local maxima with parabolic refinement of the peak time.
        let mut peak_times = Vec::new();
        let mut peak_indices = Vec::new();
        for i in 1..x_tail.len() - 1 {
            if x_tail[i] > x_tail[i - 1] && x_tail[i] > x_tail[i + 1] {
                let (a, b, c) = (x_tail[i - 1], x_tail[i], x_tail[i + 1]);
                let denom = a - 2.0 * b + c;
                let offset = if denom.abs() > f64::EPSILON {
                    0.5 * (a - c) / denom
                } else {
                    0.0
                };
                #[allow(clippy::cast_precision_loss)]
                peak_times.push(((skip + i) as f64 + offset) * opts.dt);
                peak_indices.push(skip + i);
            }
        }

        if peak_times.len() < tolerances::PERIOD_MIN_PEAKS {
            return Err(Error::Convergence(format!(
                "only {} peaks after transient, need {}",
                peak_times.len(),
                tolerances::PERIOD_MIN_PEAKS
            )));
        }

        let intervals: Vec<f64> = peak_times.windows(2).map(|w| w[1] - w[0]).collect();
        #[allow(clippy::cast_precision_loss)]
        let period = intervals.iter().sum::<f64>() / intervals.len() as f64;
        let max_dev = intervals
            .iter()
            .map(|iv| (iv - period).abs())
            .fold(0.0, f64::max);
        if max_dev > tolerances::PERIOD_JITTER_REL * period {
            return Err(Error::Convergence(format!(
                "inter-peak intervals still drifting: max deviation {max_dev:.4} h on period {period:.4} h"
            )));
        }

        // Store one period ending at the last detected peak, phase 0 at
        // an X peak.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_period = (period / opts.dt).round() as usize;
        let last_peak = *peak_indices
            .last()
            .ok_or_else(|| Error::Convergence("no peaks recorded".into()))?;
        if n_period == 0 || last_peak < n_period {
            return Err(Error::Convergence(
                "period shorter than the sample spacing or trajectory".into(),
            ));
        }
        let start = last_peak - n_period;
        let samples = states[start..last_peak].to_vec();

        Ok(Self {
            period,
            dt: opts.dt,
            samples,
        })
    }

    /// Limit-cycle period (hours).
    #[must_use]
    pub const fn period(&self) -> f64 {
        self.period
    }

    /// State at phase time `t` (hours), wrapped into `[0, period)` and
    /// linearly interpolated between stored samples.
    #[must_use]
    pub fn state_at(&self, t: f64) -> [f64; LC_VARS] {
        let n = self.samples.len();
        let wrapped = t.rem_euclid(self.period);
        let pos = wrapped / self.dt;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i0 = (pos.floor() as usize) % n;
        let i1 = (i0 + 1) % n;
        let frac = pos - pos.floor();
        let mut out = [0.0; LC_VARS];
        for v in 0..LC_VARS {
            out[v] = self.samples[i0][v] + frac * (self.samples[i1][v] - self.samples[i0][v]);
        }
        out
    }

    /// Draw a state at a uniformly random phase of the cycle.
    pub fn random_phase(&self, rng: &mut Lcg64) -> [f64; LC_VARS] {
        self.state_at(rng.next_f64() * self.period)
    }
}
