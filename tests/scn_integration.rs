// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests for the multicellular network: fixture-driven runs
//! in both modes, block layout round-trips, coupling-weight identities,
//! and knockout gating observed at the trajectory level.

use circadia::params::{GonzeParams, BMALKO_LEAK};
use circadia::scn::cell::{VAR_OUT, VAR_X};
use circadia::scn::{
    coupling_weights, CellCounts, CellType, InitialState, Knockout, ScnConfig, ScnModel,
    Trajectory,
};

/// Random-phase initial state of the published 20/20/20 example figure:
/// 40 AVP/VIP cells of 4 variables followed by 20 NAV cells of 3.
const Y0_EXAMPLE: [f64; 220] = [
    0.03649647, 0.10663466, 2.60469301, 0.01192638, 0.15020802,
    0.19639209, 1.699136, 0.04282985, 0.17498466, 0.22961959,
    1.65447964, 0.05062847, 0.27392133, 0.44823915, 1.69886225,
    0.09175747, 0.09678593, 0.5411219, 3.46699745, 0.04373477,
    0.10162063, 0.14110837, 1.85774339, 0.02871033, 0.06361829,
    0.10819374, 2.11877411, 0.0185076, 0.2658215, 0.634519,
    2.10819409, 0.10519723, 0.03096468, 0.13758529, 2.97860106,
    0.01136174, 0.05646195, 0.1040406, 2.20016264, 0.01667297,
    0.1366907, 0.17977646, 1.73219853, 0.03876298, 0.19068233,
    0.69110311, 2.75665085, 0.08382894, 0.05829896, 0.37983743,
    3.60568227, 0.0258205, 0.09417055, 0.53273561, 3.48273887,
    0.04253476, 0.03570413, 0.10808946, 2.63461023, 0.0117711,
    0.28179642, 0.56138241, 1.88543179, 0.10383703, 0.11665168,
    0.59565689, 3.33402542, 0.05275335, 0.11974919, 0.16030203,
    1.7844304, 0.03382388, 0.12658435, 0.61753486, 3.26144801,
    0.05718728, 0.03193911, 0.17491349, 3.20998031, 0.01257403,
    0.04458828, 0.10106302, 2.38934048, 0.01373802, 0.03436042,
    0.20631866, 3.33939272, 0.01403256, 0.28076279, 0.49189016,
    1.75574768, 0.0974223, 0.17125861, 0.67995127, 2.91303202,
    0.07621747, 0.09305787, 0.13268258, 1.90077683, 0.02635128,
    0.03093859, 0.13870795, 2.98752288, 0.01138396, 0.23254463,
    0.32751211, 1.62028786, 0.07131719, 0.07344282, 0.11536166,
    2.02984124, 0.02107731, 0.03316637, 0.19232516, 3.28694656,
    0.01334854, 0.16865091, 0.22075213, 1.66411195, 0.04858779,
    0.10453018, 0.14406946, 1.84449061, 0.02951992, 0.05530311,
    0.36288311, 3.6013551, 0.0243991, 0.03799234, 0.24170443,
    3.44350626, 0.01595947, 0.03255529, 0.11877973, 2.7951997,
    0.01127483, 0.04080215, 0.26524999, 3.49495685, 0.01737934,
    0.03095935, 0.13779727, 2.98029873, 0.01136584, 0.06170946,
    0.39814127, 3.60625163, 0.02743211, 0.18540888, 0.24484723,
    1.64112094, 0.05406722, 0.0372021, 0.10556097, 2.5800791,
    0.01207008, 0.25520479, 0.6565869, 2.21238126, 0.1035541,
    0.17709525, 0.23263695, 1.65152703, 0.05028992, 0.33242437,
    3.58392194, 0.06929097, 0.43548697, 3.59463344, 0.04627113,
    0.10100334, 2.35641368, 0.12577388, 0.16705929, 1.76430733,
    0.28085039, 0.57109287, 1.90849285, 0.0996584, 0.54998659,
    3.44913621, 0.03121411, 0.16046703, 3.1335892, 0.17179048,
    0.22511317, 1.65919141, 0.05515041, 0.36199537, 3.60102535,
    0.21525365, 0.29388882, 1.6198416, 0.0493198, 0.10139819,
    2.30291576, 0.06848032, 0.43169606, 3.59658506, 0.18030285,
    0.68627538, 2.84042064, 0.06126784, 0.10670654, 2.14364334,
    0.03377758, 0.11327042, 2.7216808, 0.21964986, 0.30198587,
    1.61895939, 0.10876944, 0.57584794, 3.38915257, 0.14186617,
    0.18602192, 1.71872694, 0.28201589, 0.55856572, 1.87901187,
];

fn example_config() -> ScnConfig {
    let mut cfg = ScnConfig::new(
        GonzeParams::default(),
        CellCounts::default(),
        InitialState::Explicit(Y0_EXAMPLE.to_vec()),
    );
    cfg.kav = 5.0;
    cfg.t_end = 24.0;
    cfg.report_dt = 0.5;
    cfg
}

#[test]
fn fixture_matches_the_standard_network_shape() {
    let cells = CellCounts::default();
    assert_eq!(Y0_EXAMPLE.len(), cells.total_states());
    let cfg = example_config();
    assert!(cfg.validate().is_ok());
}

#[test]
fn trajectory_has_time_plus_one_column_per_state() {
    let traj = ScnModel::new(example_config())
        .unwrap()
        .run_deterministic()
        .unwrap();
    assert_eq!(traj.n_columns(), 221);
    assert_eq!(traj.n_points(), 49, "24 h at 0.5 h spacing plus t = 0");
}

#[test]
fn population_blocks_round_trip_through_the_layout() {
    let model = ScnModel::new(example_config()).unwrap();
    let layout = *model.layout();
    assert_eq!(layout.block_range(CellType::Avp), 0..80);
    assert_eq!(layout.block_range(CellType::Vip), 80..160);
    assert_eq!(layout.block_range(CellType::Nav), 160..220);

    // Slicing the three blocks and re-concatenating reproduces the
    // fixture exactly.
    let rebuilt: Vec<f64> = [CellType::Avp, CellType::Vip, CellType::Nav]
        .into_iter()
        .flat_map(|ty| Y0_EXAMPLE[layout.block_range(ty)].to_vec())
        .collect();
    assert_eq!(rebuilt, Y0_EXAMPLE.to_vec());

    // Population mean of X over the fixture, computed by hand against
    // the trajectory accessor.
    let traj = model.run_deterministic().unwrap();
    let by_hand: f64 = (0..20).map(|i| Y0_EXAMPLE[4 * i + VAR_X]).sum::<f64>() / 20.0;
    let via_accessor = traj.population_mean(0, CellType::Avp, VAR_X).unwrap();
    assert!((by_hand - via_accessor).abs() < 1e-15);
}

#[test]
fn deterministic_run_from_fixture_stays_physical() {
    let traj = ScnModel::new(example_config())
        .unwrap()
        .run_deterministic()
        .unwrap();
    for (t, row) in traj.rows() {
        for &v in row {
            assert!(v.is_finite() && v >= 0.0, "bad value {v} at t = {t}");
        }
    }
    assert_eq!(traj.clamp_events(), 0, "fixture run should be clean");
}

#[test]
fn stochastic_run_from_fixture_is_count_quantized() {
    let mut cfg = example_config();
    cfg.volume = 150.0;
    cfg.t_end = 6.0;
    cfg.seed = 0;
    let traj = ScnModel::new(cfg).unwrap().run().unwrap();
    assert_eq!(traj.n_points(), 13);
    for (t, row) in traj.rows() {
        for &v in row {
            let count = v * 150.0;
            assert!(v >= 0.0, "negative concentration at t = {t}");
            assert!((count - count.round()).abs() < 1e-9, "non-integer count at t = {t}");
        }
    }
}

#[test]
fn coupling_weights_sum_exactly_over_the_grid() {
    for kav in [0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0] {
        let (ar, vr) = coupling_weights(kav);
        assert_eq!(ar + vr, 1.0, "weights must sum to exactly 1 at kav = {kav}");
    }
}

#[test]
fn network_without_avp_cells_keeps_finite_coupling() {
    let cells = CellCounts {
        avp: 0,
        vip: 20,
        nav: 20,
    };
    let cfg = ScnConfig::new(
        GonzeParams::default(),
        cells,
        InitialState::Explicit(vec![0.4; cells.total_states()]),
    );
    let model = ScnModel::new(cfg).unwrap();
    let traj = model.run_deterministic().unwrap();
    for (t, row) in traj.rows() {
        assert!(row.iter().all(|v| v.is_finite()), "NaN leaked at t = {t}");
    }
}

fn mean_avp_output_second_half(traj: &Trajectory) -> f64 {
    let half = traj.n_points() / 2;
    let mut sum = 0.0;
    for p in half..traj.n_points() {
        sum += traj.population_mean(p, CellType::Avp, VAR_OUT).unwrap();
    }
    sum / (traj.n_points() - half) as f64
}

#[test]
fn bmal1_knockout_suppresses_but_does_not_silence_output() {
    let mut cfg = example_config();
    cfg.t_end = 72.0;
    let wt = ScnModel::new(cfg.clone()).unwrap().run_deterministic().unwrap();
    cfg.bmalko = Some(Knockout::Avp);
    let model = ScnModel::new(cfg).unwrap();
    assert_eq!(model.stage1_scale(CellType::Avp), BMALKO_LEAK);
    let ko = model.run_deterministic().unwrap();

    let wt_out = mean_avp_output_second_half(&wt);
    let ko_out = mean_avp_output_second_half(&ko);
    assert!(ko_out < 0.5 * wt_out, "knockout output {ko_out} not suppressed vs {wt_out}");
    assert!(ko_out > 0.0, "leaky knockout must not silence the cell entirely");
}

#[test]
fn output_knockout_decays_the_output_pool() {
    let mut cfg = example_config();
    cfg.t_end = 72.0;
    cfg.ko = Some(Knockout::Avp);
    let traj = ScnModel::new(cfg).unwrap().run_deterministic().unwrap();
    let start = traj.population_mean(0, CellType::Avp, VAR_OUT).unwrap();
    let end = mean_avp_output_second_half(&traj);
    assert!(end < 0.05 * start.max(0.01), "A pool should decay with production gated off");
}

#[test]
fn rejects_fixture_against_mismatched_populations() {
    let cells = CellCounts {
        avp: 10,
        vip: 20,
        nav: 20,
    };
    let cfg = ScnConfig::new(
        GonzeParams::default(),
        cells,
        InitialState::Explicit(Y0_EXAMPLE.to_vec()),
    );
    assert!(ScnModel::new(cfg).is_err());
}
