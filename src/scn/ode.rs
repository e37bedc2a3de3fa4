// SPDX-License-Identifier: AGPL-3.0-or-later
//! Deterministic integration: fixed-step RK4 over the whole network.
//!
//! The reporting grid is decoupled from the internal step. Each report
//! interval is covered by `ceil(report_dt / ode_dt)` equal substeps, so
//! rows land exactly on multiples of `report_dt` with no float drift.
//! Concentrations are clamped at zero after every step; each clamped
//! component is counted on the trajectory rather than silently hidden.

use super::network::ScnModel;
use super::trajectory::Trajectory;

struct Rk4Scratch {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    tmp: Vec<f64>,
}

impl Rk4Scratch {
    fn new(n: usize) -> Self {
        Self {
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            tmp: vec![0.0; n],
        }
    }
}

/// One RK4 step of size `h` in place. Returns the number of components
/// clamped back to zero.
fn rk4_step(model: &ScnModel, state: &mut [f64], h: f64, s: &mut Rk4Scratch) -> u64 {
    let n = state.len();
    let half = 0.5 * h;

    model.rhs(state, &mut s.k1);
    for i in 0..n {
        s.tmp[i] = half.mul_add(s.k1[i], state[i]);
    }
    model.rhs(&s.tmp, &mut s.k2);
    for i in 0..n {
        s.tmp[i] = half.mul_add(s.k2[i], state[i]);
    }
    model.rhs(&s.tmp, &mut s.k3);
    for i in 0..n {
        s.tmp[i] = h.mul_add(s.k3[i], state[i]);
    }
    model.rhs(&s.tmp, &mut s.k4);

    let sixth = h / 6.0;
    let mut clamped = 0;
    for i in 0..n {
        let slope = 2.0f64.mul_add(s.k2[i] + s.k3[i], s.k1[i] + s.k4[i]);
        let next = sixth.mul_add(slope, state[i]);
        if next < 0.0 {
            clamped += 1;
            state[i] = 0.0;
        } else {
            state[i] = next;
        }
    }
    clamped
}

/// Integrate the network deterministically from `y0` over the
/// configured horizon, recording one row per report point (the initial
/// state included).
#[must_use]
pub fn integrate(model: &ScnModel, y0: &[f64]) -> Trajectory {
    let cfg = model.config();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_reports = (cfg.t_end / cfg.report_dt).floor() as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_sub = (cfg.report_dt / cfg.ode_dt).ceil().max(1.0) as usize;
    #[allow(clippy::cast_precision_loss)]
    let h = cfg.report_dt / n_sub as f64;

    let mut traj = Trajectory::with_capacity(*model.layout(), n_reports + 1);
    let mut state = y0.to_vec();
    let mut scratch = Rk4Scratch::new(state.len());
    let mut clamped = 0_u64;

    traj.push_row(0.0, &state);
    for report in 1..=n_reports {
        for _ in 0..n_sub {
            clamped += rk4_step(model, &mut state, h, &mut scratch);
        }
        #[allow(clippy::cast_precision_loss)]
        traj.push_row(report as f64 * cfg.report_dt, &state);
    }
    traj.add_clamp_events(clamped);
    traj
}
