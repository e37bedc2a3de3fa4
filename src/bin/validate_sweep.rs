// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validate the coupling-ratio and cell-ratio sweep machinery.
//!
//! Runs reduced sweeps (small populations, short horizon) and checks
//! run bookkeeping, paired initial conditions across genotypes, seed
//! handling across replicates, and reproducibility of a full sweep.
//!
//! Exit code 0 = all checks passed.

use circadia::params::GonzeParams;
use circadia::scn::sweep::{
    cell_ratio_sweep, coupling_sweep, Genotype, SweepOptions, AVP_COUNT_GRID, AV_TOTAL, KAV_GRID,
};
use circadia::scn::{CellCounts, LimitCycle, PeriodOptions};
use circadia::validation::Validator;
use circadia::Result;

fn reduced_opts() -> SweepOptions {
    SweepOptions {
        replicates: 2,
        base_seed: 7,
        cells: CellCounts {
            avp: 4,
            vip: 4,
            nav: 3,
        },
        volume: 80.0,
        t_end: 2.0,
        report_dt: 0.5,
    }
}

fn run_checks(v: &mut Validator) -> Result<()> {
    let params = GonzeParams::default();
    let cycle = LimitCycle::find(&params, &PeriodOptions::default())?;
    let opts = reduced_opts();

    v.section("── standard grids ──");
    v.check_count("coupling-ratio grid size", KAV_GRID.len(), 7);
    v.check_count("cell-ratio grid size", AVP_COUNT_GRID.len(), 7);
    v.check_true(
        "coupling grid strictly increasing",
        KAV_GRID.windows(2).all(|w| w[0] < w[1]),
    );
    v.check_true(
        "cell-ratio grid within the AVP + VIP total",
        AVP_COUNT_GRID.iter().all(|&a| a <= AV_TOTAL),
    );

    v.section("── coupling sweep bookkeeping ──");
    let kavs = [0.5, 2.0];
    let runs = coupling_sweep(&params, &cycle, &kavs, &opts)?;
    v.check_count(
        "run count = ratios x replicates x genotypes",
        runs.len(),
        kavs.len() * opts.replicates * Genotype::ALL.len(),
    );
    let rows_ok = runs.iter().all(|r| r.trajectory.n_points() == 5);
    v.check_true("every run reports the full grid", rows_ok);

    v.section("── paired initial conditions ──");
    let find = |g: Genotype, rep: usize| {
        runs.iter()
            .find(|r| r.point.genotype == g && r.point.replicate == rep && r.point.kav == 0.5)
    };
    if let (Some(wt), Some(avp_ko), Some(vip_ko)) = (
        find(Genotype::WildType, 0),
        find(Genotype::AvpBmalKo, 0),
        find(Genotype::VipBmalKo, 0),
    ) {
        let same = |a: &[f64], b: &[f64]| {
            a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
        };
        v.check_true(
            "WT and AVP-BmalKO share the replicate draw",
            same(wt.trajectory.state_row(0), avp_ko.trajectory.state_row(0)),
        );
        v.check_true(
            "WT and VIP-BmalKO share the replicate draw",
            same(wt.trajectory.state_row(0), vip_ko.trajectory.state_row(0)),
        );
    } else {
        v.check_true("sweep contains all genotypes of replicate 0", false);
    }
    if let (Some(r0), Some(r1)) = (find(Genotype::WildType, 0), find(Genotype::WildType, 1)) {
        v.check_true("replicates carry distinct seeds", r0.point.seed != r1.point.seed);
        let differs = r0
            .trajectory
            .state_row(0)
            .iter()
            .zip(r1.trajectory.state_row(0))
            .any(|(x, y)| (x - y).abs() > 0.0);
        v.check_true("replicates start from distinct phases", differs);
    } else {
        v.check_true("sweep contains both replicates", false);
    }

    v.section("── cell-ratio sweep ──");
    let counts = [4, 20, 36];
    let ratio_runs = cell_ratio_sweep(&params, &cycle, &counts, &opts)?;
    v.check_count(
        "run count",
        ratio_runs.len(),
        counts.len() * opts.replicates * Genotype::ALL.len(),
    );
    v.check_true(
        "AVP + VIP held at the fixed total",
        ratio_runs
            .iter()
            .all(|r| r.point.cells.avp + r.point.cells.vip == AV_TOTAL),
    );
    v.check_true(
        "cell-ratio sweep runs at balanced coupling",
        ratio_runs.iter().all(|r| (r.point.kav - 1.0).abs() == 0.0),
    );

    v.section("── reproducibility ──");
    let again = coupling_sweep(&params, &cycle, &kavs, &opts)?;
    let identical = runs.iter().zip(&again).all(|(a, b)| {
        a.trajectory
            .rows()
            .zip(b.trajectory.rows())
            .all(|(ra, rb)| ra.1.iter().zip(rb.1).all(|(x, y)| x.to_bits() == y.to_bits()))
    });
    v.check_true("repeated sweep is bit-identical", identical);

    v.section("── rejected configurations ──");
    v.check_true(
        "empty coupling grid rejected",
        coupling_sweep(&params, &cycle, &[], &opts).is_err(),
    );
    v.check_true(
        "oversized AVP count rejected",
        cell_ratio_sweep(&params, &cycle, &[AV_TOTAL + 1], &opts).is_err(),
    );
    Ok(())
}

fn main() {
    let mut v = Validator::new("validate_sweep");
    if let Err(e) = run_checks(&mut v) {
        v.check_true(&format!("sweep checks aborted: {e}"), false);
    }
    v.finish()
}
