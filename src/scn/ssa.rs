// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stochastic simulation: exact Gillespie direct method.
//!
//! Concentrations are converted to molecule counts at system size Ω
//! (`volume`); every state variable carries one birth and one death
//! channel whose propensity is `Ω · rate(count / Ω)` with the rate
//! expressions shared with the deterministic mode. The mean-field
//! coupling signal is recomputed once per event from a consistent
//! snapshot of all counts, then time advances by an exponential waiting
//! time and exactly one channel fires (±1 molecule).
//!
//! Report rows are emitted on the configured grid, holding the counts
//! converted back to concentrations. If every propensity reaches zero
//! the state is absorbing; the remaining rows repeat the frozen state.

use super::network::ScnModel;
use super::rng::Lcg64;
use super::trajectory::Trajectory;

/// Run the direct-method SSA from the concentration vector `y0`,
/// drawing all randomness from `rng`.
#[must_use]
pub fn simulate(model: &ScnModel, y0: &[f64], rng: &mut Lcg64) -> Trajectory {
    let cfg = model.config();
    let layout = *model.layout();
    let n = layout.n_states();
    let vol = cfg.volume;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_reports = (cfg.t_end / cfg.report_dt).floor() as usize;
    let mut traj = Trajectory::with_capacity(layout, n_reports + 1);

    // Integer molecule counts, kept as whole-valued f64.
    let mut counts: Vec<f64> = y0.iter().map(|&v| (v * vol).round().max(0.0)).collect();
    let mut conc = vec![0.0; n];
    // Per-variable [birth, death] channels, flattened.
    let mut props = vec![0.0; 2 * n];
    let mut clamped = 0_u64;

    for i in 0..n {
        conc[i] = counts[i] / vol;
    }
    traj.push_row(0.0, &conc);
    let mut next_report = 1_usize;
    let mut t = 0.0;

    loop {
        for i in 0..n {
            conc[i] = counts[i] / vol;
        }
        let c = model.coupling(&conc);
        let mut a0 = 0.0;
        for (ty, idx, offset) in layout.cells() {
            let global = layout.global_cell_index(ty, idx);
            let nv = ty.n_vars();
            let rates = model.cell_rates(ty, global, &conc[offset..offset + nv], c);
            for (v, pair) in rates.iter().enumerate().take(nv) {
                let birth = vol * pair[0];
                let death = vol * pair[1];
                props[2 * (offset + v)] = birth;
                props[2 * (offset + v) + 1] = death;
                a0 += birth + death;
            }
        }

        if a0 <= 0.0 {
            // Absorbing state: nothing can fire again.
            break;
        }

        let tau = rng.exp_variate(a0);
        let t_next = t + tau;

        #[allow(clippy::cast_precision_loss)]
        while next_report <= n_reports && next_report as f64 * cfg.report_dt <= t_next {
            #[allow(clippy::cast_precision_loss)]
            traj.push_row(next_report as f64 * cfg.report_dt, &conc);
            next_report += 1;
        }
        if t_next >= cfg.t_end {
            break;
        }

        // Direct-method channel selection. Rounding in the cumulative
        // scan can leave a sliver of `target`; fall back to the last
        // fireable channel rather than a zero-propensity one.
        let mut target = rng.next_f64() * a0;
        let mut chosen = 0;
        for (i, &p) in props.iter().enumerate() {
            if p > 0.0 {
                chosen = i;
                if target < p {
                    break;
                }
                target -= p;
            }
        }
        let state_idx = chosen / 2;
        if chosen % 2 == 0 {
            counts[state_idx] += 1.0;
        } else {
            counts[state_idx] -= 1.0;
            if counts[state_idx] < 0.0 {
                counts[state_idx] = 0.0;
                clamped += 1;
            }
        }
        t = t_next;
    }

    // Fill any remaining grid points with the final (frozen) state.
    #[allow(clippy::cast_precision_loss)]
    while next_report <= n_reports {
        traj.push_row(next_report as f64 * cfg.report_dt, &conc);
        next_report += 1;
    }
    traj.add_clamp_events(clamped);
    traj
}
