// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validate the multicellular network in both integration modes.
//!
//! Runs the standard 20/20/20 network deterministically and
//! stochastically, checking the trajectory shape, non-negativity,
//! synchrony of identical cells, knockout gating, and bit-exact
//! reproducibility for a fixed seed.
//!
//! Exit code 0 = all checks passed.

use circadia::params::{GonzeParams, BMALKO_LEAK};
use circadia::scn::cell::{VAR_OUT, VAR_X};
use circadia::scn::{
    CellCounts, CellType, InitialState, Knockout, LimitCycle, PeriodOptions, ScnConfig, ScnModel,
    Trajectory,
};
use circadia::validation::Validator;
use circadia::Result;

fn deterministic_config() -> ScnConfig {
    let cells = CellCounts::default();
    let mut cfg = ScnConfig::new(
        GonzeParams::default(),
        cells,
        InitialState::Explicit(vec![0.5; cells.total_states()]),
    );
    cfg.t_end = 72.0;
    cfg.report_dt = 0.5;
    cfg
}

fn run_deterministic(cfg: ScnConfig) -> Result<Trajectory> {
    ScnModel::new(cfg)?.run_deterministic()
}

fn check_deterministic(v: &mut Validator) -> Result<()> {
    v.section("── deterministic mode, 20/20/20 network ──");
    let traj = run_deterministic(deterministic_config())?;
    v.check_count("report rows (72 h / 0.5 h + 1)", traj.n_points(), 145);
    v.check_count("logical columns (220 states + time)", traj.n_columns(), 221);
    let clean = traj
        .rows()
        .all(|(_, row)| row.iter().all(|&x| x.is_finite() && x >= 0.0));
    v.check_true("all states finite and non-negative", clean);
    v.check_count("clamp events", usize::try_from(traj.clamp_events()).unwrap_or(usize::MAX), 0);

    let layout = *traj.layout();
    let last = traj.final_state().unwrap_or(&[]);
    let a0 = layout.cell_offset(CellType::Avp, 0);
    let a19 = layout.cell_offset(CellType::Avp, 19);
    v.check(
        "identical AVP cells stay synchronized",
        last[a0 + VAR_X],
        last[a19 + VAR_X],
        0.0,
    );

    let again = run_deterministic(deterministic_config())?;
    let identical = traj
        .rows()
        .zip(again.rows())
        .all(|(a, b)| a.1.iter().zip(b.1).all(|(x, y)| x.to_bits() == y.to_bits()));
    v.check_true("re-run is bit-identical", identical);

    v.section("── Bmal1 knockout gating ──");
    let mut ko_cfg = deterministic_config();
    ko_cfg.bmalko = Some(Knockout::Avp);
    let model = ScnModel::new(ko_cfg)?;
    v.check(
        "AVP Stage-1 scale equals the leak",
        model.stage1_scale(CellType::Avp),
        BMALKO_LEAK,
        0.0,
    );
    v.check("VIP Stage-1 scale untouched", model.stage1_scale(CellType::Vip), 1.0, 0.0);
    v.check_true("leak strictly positive", model.stage1_scale(CellType::Avp) > 0.0);
    let ko_traj = model.run_deterministic()?;
    let mean_out = |t: &Trajectory| {
        let half = t.n_points() / 2;
        let mut sum = 0.0;
        for p in half..t.n_points() {
            sum += t.population_mean(p, CellType::Avp, VAR_OUT).unwrap_or(0.0);
        }
        sum / (t.n_points() - half) as f64
    };
    v.check_true(
        "knocked-out AVP output suppressed below wild type",
        mean_out(&ko_traj) < 0.5 * mean_out(&traj),
    );
    Ok(())
}

fn check_stochastic(v: &mut Validator) -> Result<()> {
    v.section("── stochastic mode ──");
    let params = GonzeParams::default();
    let cycle = LimitCycle::find(&params, &PeriodOptions::default())?;
    let cells = CellCounts {
        avp: 5,
        vip: 5,
        nav: 5,
    };
    let mut cfg = ScnConfig::new(params, cells, InitialState::RandomPhase(cycle));
    cfg.volume = 200.0;
    cfg.t_end = 12.0;
    cfg.report_dt = 0.5;
    cfg.seed = 42;

    let traj = ScnModel::new(cfg.clone())?.run()?;
    v.check_count("report rows (12 h / 0.5 h + 1)", traj.n_points(), 25);
    let quantized = traj.rows().all(|(_, row)| {
        row.iter().all(|&x| {
            let count = x * 200.0;
            x >= 0.0 && (count - count.round()).abs() < 1e-9
        })
    });
    v.check_true("concentrations quantized at the system size", quantized);

    let again = ScnModel::new(cfg.clone())?.run()?;
    let identical = traj
        .rows()
        .zip(again.rows())
        .all(|(a, b)| a.1.iter().zip(b.1).all(|(x, y)| x.to_bits() == y.to_bits()));
    v.check_true("same seed is bit-identical", identical);

    let mut other = cfg;
    other.seed = 43;
    let diverged = ScnModel::new(other)?.run()?;
    let differs = traj
        .final_state()
        .unwrap_or(&[])
        .iter()
        .zip(diverged.final_state().unwrap_or(&[]))
        .any(|(x, y)| (x - y).abs() > 0.0);
    v.check_true("different seed diverges", differs);

    v.section("── empty-population coupling guard ──");
    let no_avp = CellCounts {
        avp: 0,
        vip: 5,
        nav: 5,
    };
    let cfg = ScnConfig::new(
        GonzeParams::default(),
        no_avp,
        InitialState::Explicit(vec![0.5; no_avp.total_states()]),
    );
    let model = ScnModel::new(cfg)?;
    let state = vec![0.5; no_avp.total_states()];
    v.check_true("coupling finite with zero AVP cells", model.coupling(&state).is_finite());
    Ok(())
}

fn main() {
    let mut v = Validator::new("validate_manycell");
    v.section("── layouts ──");
    let standard = CellCounts::default();
    v.check_count("standard network cells", standard.total_cells(), 60);
    v.check_count("standard network states", standard.total_states(), 220);
    let paper = CellCounts::PAPER;
    v.check_count("anatomical network cells", paper.total_cells(), 250);
    v.check_count("anatomical network states", paper.total_states(), 830);
    if let Err(e) = check_deterministic(&mut v) {
        v.check_true(&format!("deterministic checks aborted: {e}"), false);
    }
    if let Err(e) = check_stochastic(&mut v) {
        v.check_true(&format!("stochastic checks aborted: {e}"), false);
    }
    v.finish()
}
