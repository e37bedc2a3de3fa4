// SPDX-License-Identifier: AGPL-3.0-or-later
//! Experiment sweeps: coupling-ratio and cell-ratio grids over seeded
//! stochastic replicates.
//!
//! Each grid point is expanded into (replicate, genotype) runs. The
//! replicate fixes the seed, and the seed fixes the random-phase
//! initial draw, so the three genotypes of one replicate start from the
//! same state and differ only in the knockout gates. Runs are
//! independent and fan out across a rayon pool; each individual run
//! stays single-threaded.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::params::GonzeParams;

use super::cell::CellCounts;
use super::config::{InitialState, Knockout, ScnConfig};
use super::limit_cycle::LimitCycle;
use super::network::{counts_with_avp, ScnModel};
use super::trajectory::Trajectory;

/// AVP:VIP coupling-strength ratios of the standard coupling sweep.
pub const KAV_GRID: [f64; 7] = [0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0];

/// AVP cell counts of the standard cell-ratio sweep; VIP makes up the
/// rest of [`AV_TOTAL`].
pub const AVP_COUNT_GRID: [usize; 7] = [4, 7, 13, 20, 27, 33, 36];

/// Fixed AVP + VIP total of the cell-ratio sweep.
pub const AV_TOTAL: usize = 40;

/// Genotypes compared at every grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genotype {
    /// No perturbation.
    WildType,
    /// Bmal1 knockout in AVP cells.
    AvpBmalKo,
    /// Bmal1 knockout in VIP cells.
    VipBmalKo,
}

impl Genotype {
    /// All genotypes in sweep order.
    pub const ALL: [Self; 3] = [Self::WildType, Self::AvpBmalKo, Self::VipBmalKo];

    /// The Bmal1 knockout this genotype applies, if any.
    #[must_use]
    pub const fn bmalko(self) -> Option<Knockout> {
        match self {
            Self::WildType => None,
            Self::AvpBmalKo => Some(Knockout::Avp),
            Self::VipBmalKo => Some(Knockout::Vip),
        }
    }

    /// Short label for report output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WildType => "WT",
            Self::AvpBmalKo => "AVP-BmalKO",
            Self::VipBmalKo => "VIP-BmalKO",
        }
    }
}

/// Identity of one run within a sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepPoint {
    /// Coupling ratio of this run.
    pub kav: f64,
    /// Population sizes of this run.
    pub cells: CellCounts,
    /// Genotype of this run.
    pub genotype: Genotype,
    /// Replicate index within the grid point.
    pub replicate: usize,
    /// Seed the run was executed with.
    pub seed: u64,
}

/// One completed sweep run.
#[derive(Debug, Clone)]
pub struct SweepRun {
    /// Which grid point and replicate this is.
    pub point: SweepPoint,
    /// The recorded stochastic trajectory.
    pub trajectory: Trajectory,
}

/// Shared settings for a sweep.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Stochastic replicates per grid point and genotype.
    pub replicates: usize,
    /// Seed of replicate 0; replicate `r` uses `base_seed + r`.
    pub base_seed: u64,
    /// Population sizes (the cell-ratio sweep overrides AVP and VIP).
    pub cells: CellCounts,
    /// System size Ω for the stochastic runs.
    pub volume: f64,
    /// Simulation horizon (hours).
    pub t_end: f64,
    /// Reporting interval (hours).
    pub report_dt: f64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            replicates: 10,
            base_seed: 0,
            cells: CellCounts::default(),
            volume: 1000.0,
            t_end: 180.0,
            report_dt: 0.5,
        }
    }
}

fn run_point(
    params: &GonzeParams,
    cycle: &LimitCycle,
    point: SweepPoint,
    opts: &SweepOptions,
) -> Result<SweepRun> {
    let mut cfg = ScnConfig::new(
        *params,
        point.cells,
        InitialState::RandomPhase(cycle.clone()),
    );
    cfg.kav = point.kav;
    cfg.bmalko = point.genotype.bmalko();
    cfg.volume = opts.volume;
    cfg.t_end = opts.t_end;
    cfg.report_dt = opts.report_dt;
    cfg.seed = point.seed;
    let trajectory = ScnModel::new(cfg)?.run()?;
    Ok(SweepRun { point, trajectory })
}

fn run_all(
    params: &GonzeParams,
    cycle: &LimitCycle,
    points: Vec<SweepPoint>,
    opts: &SweepOptions,
) -> Result<Vec<SweepRun>> {
    points
        .into_par_iter()
        .map(|p| run_point(params, cycle, p, opts))
        .collect()
}

/// Sweep the AVP:VIP coupling ratio over `kavs` with fixed populations.
///
/// Every (ratio, replicate) pair runs all three genotypes from the same
/// random-phase initial state.
///
/// # Errors
///
/// Returns [`Error::Config`] if `kavs` is empty or any run's
/// configuration is invalid.
pub fn coupling_sweep(
    params: &GonzeParams,
    cycle: &LimitCycle,
    kavs: &[f64],
    opts: &SweepOptions,
) -> Result<Vec<SweepRun>> {
    if kavs.is_empty() {
        return Err(Error::Config("coupling sweep needs at least one ratio".into()));
    }
    let mut points = Vec::with_capacity(kavs.len() * opts.replicates * Genotype::ALL.len());
    for &kav in kavs {
        for replicate in 0..opts.replicates {
            let seed = opts.base_seed + replicate as u64;
            for genotype in Genotype::ALL {
                points.push(SweepPoint {
                    kav,
                    cells: opts.cells,
                    genotype,
                    replicate,
                    seed,
                });
            }
        }
    }
    run_all(params, cycle, points, opts)
}

/// Sweep the AVP cell count over `avp_counts`, holding AVP + VIP at
/// [`AV_TOTAL`] and NAV at `opts.cells.nav`, with `kav = 1`.
///
/// # Errors
///
/// Returns [`Error::Config`] if `avp_counts` is empty or an entry
/// exceeds [`AV_TOTAL`].
pub fn cell_ratio_sweep(
    params: &GonzeParams,
    cycle: &LimitCycle,
    avp_counts: &[usize],
    opts: &SweepOptions,
) -> Result<Vec<SweepRun>> {
    if avp_counts.is_empty() {
        return Err(Error::Config("cell-ratio sweep needs at least one count".into()));
    }
    if let Some(&bad) = avp_counts.iter().find(|&&a| a > AV_TOTAL) {
        return Err(Error::Config(format!(
            "AVP count {bad} exceeds the fixed AVP + VIP total {AV_TOTAL}"
        )));
    }
    let mut points = Vec::with_capacity(avp_counts.len() * opts.replicates * Genotype::ALL.len());
    for &avp in avp_counts {
        let cells = counts_with_avp(avp, AV_TOTAL, opts.cells.nav);
        for replicate in 0..opts.replicates {
            let seed = opts.base_seed + replicate as u64;
            for genotype in Genotype::ALL {
                points.push(SweepPoint {
                    kav: 1.0,
                    cells,
                    genotype,
                    replicate,
                    seed,
                });
            }
        }
    }
    run_all(params, cycle, points, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scn::limit_cycle::PeriodOptions;

    fn test_cycle() -> LimitCycle {
        LimitCycle::find(&GonzeParams::default(), &PeriodOptions::default()).unwrap()
    }

    fn light_opts() -> SweepOptions {
        SweepOptions {
            replicates: 2,
            base_seed: 100,
            cells: CellCounts {
                avp: 3,
                vip: 3,
                nav: 2,
            },
            volume: 60.0,
            t_end: 1.0,
            report_dt: 0.5,
        }
    }

    #[test]
    fn coupling_sweep_run_count() {
        let runs = coupling_sweep(
            &GonzeParams::default(),
            &test_cycle(),
            &[0.5, 2.0],
            &light_opts(),
        )
        .unwrap();
        assert_eq!(runs.len(), 2 * 2 * 3, "ratios x replicates x genotypes");
    }

    #[test]
    fn genotypes_of_a_replicate_share_initial_state() {
        let runs = coupling_sweep(&GonzeParams::default(), &test_cycle(), &[1.0], &light_opts())
            .unwrap();
        let wt = runs
            .iter()
            .find(|r| r.point.genotype == Genotype::WildType && r.point.replicate == 0)
            .unwrap();
        let ko = runs
            .iter()
            .find(|r| r.point.genotype == Genotype::AvpBmalKo && r.point.replicate == 0)
            .unwrap();
        for (a, b) in wt.trajectory.state_row(0).iter().zip(ko.trajectory.state_row(0)) {
            assert_eq!(a.to_bits(), b.to_bits(), "paired runs must share the draw");
        }
    }

    #[test]
    fn replicates_use_distinct_seeds() {
        let runs = coupling_sweep(&GonzeParams::default(), &test_cycle(), &[1.0], &light_opts())
            .unwrap();
        let r0 = runs
            .iter()
            .find(|r| r.point.genotype == Genotype::WildType && r.point.replicate == 0)
            .unwrap();
        let r1 = runs
            .iter()
            .find(|r| r.point.genotype == Genotype::WildType && r.point.replicate == 1)
            .unwrap();
        assert_ne!(r0.point.seed, r1.point.seed);
        let differs = r0
            .trajectory
            .state_row(0)
            .iter()
            .zip(r1.trajectory.state_row(0))
            .any(|(a, b)| (a - b).abs() > 0.0);
        assert!(differs, "replicates should start from different phases");
    }

    #[test]
    fn sweeps_are_reproducible() {
        let p = GonzeParams::default();
        let lc = test_cycle();
        let a = coupling_sweep(&p, &lc, &[1.0], &light_opts()).unwrap();
        let b = coupling_sweep(&p, &lc, &[1.0], &light_opts()).unwrap();
        for (ra, rb) in a.iter().zip(&b) {
            for (rowa, rowb) in ra.trajectory.rows().zip(rb.trajectory.rows()) {
                for (x, y) in rowa.1.iter().zip(rowb.1) {
                    assert_eq!(x.to_bits(), y.to_bits());
                }
            }
        }
    }

    #[test]
    fn cell_ratio_sweep_holds_av_total() {
        let runs = cell_ratio_sweep(
            &GonzeParams::default(),
            &test_cycle(),
            &[4, 36],
            &light_opts(),
        )
        .unwrap();
        for run in &runs {
            assert_eq!(run.point.cells.avp + run.point.cells.vip, AV_TOTAL);
            assert_eq!(run.point.cells.nav, 2);
            assert_eq!(run.point.kav, 1.0);
        }
        assert_eq!(runs.len(), 2 * 2 * 3);
    }

    #[test]
    fn rejects_empty_and_oversized_grids() {
        let p = GonzeParams::default();
        let lc = test_cycle();
        assert!(coupling_sweep(&p, &lc, &[], &light_opts()).is_err());
        assert!(cell_ratio_sweep(&p, &lc, &[], &light_opts()).is_err());
        assert!(cell_ratio_sweep(&p, &lc, &[AV_TOTAL + 1], &light_opts()).is_err());
    }

    #[test]
    fn standard_grids_are_well_formed() {
        assert!(KAV_GRID.windows(2).all(|w| w[0] < w[1]));
        assert!(AVP_COUNT_GRID.windows(2).all(|w| w[0] < w[1]));
        assert!(AVP_COUNT_GRID.iter().all(|&a| a <= AV_TOTAL));
    }
}
