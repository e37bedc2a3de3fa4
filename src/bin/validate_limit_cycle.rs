// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validate the single-oscillator limit cycle against the published
//! baseline.
//!
//! Checks the free-running period of the wild-type parameter set, the
//! periodicity and positivity of the stored cycle, the coupling-weight
//! identity, and loud failure on non-oscillatory parameters.
//!
//! Exit code 0 = all checks passed.

use circadia::params::GonzeParams;
use circadia::scn::{coupling_weights, LimitCycle, PeriodOptions};
use circadia::tolerances;
use circadia::validation::Validator;

fn main() {
    let mut v = Validator::new("validate_limit_cycle");
    let params = GonzeParams::default();
    let opts = PeriodOptions::default();

    v.section("── free-running period ──");
    match LimitCycle::find(&params, &opts) {
        Ok(lc) => {
            v.check(
                "wild-type period (h)",
                lc.period(),
                tolerances::GONZE_PERIOD_H,
                tolerances::PERIOD_TOL_H,
            );

            v.section("── cycle samples ──");
            let s0 = lc.state_at(0.0);
            let s1 = lc.state_at(lc.period());
            let mut max_gap = 0.0_f64;
            for i in 0..4 {
                max_gap = max_gap.max((s0[i] - s1[i]).abs());
            }
            v.check("wrap-around gap", max_gap, 0.0, 1e-9);
            let quarter = lc.state_at(lc.period() / 4.0);
            v.check_true(
                "quarter-phase state differs from phase 0",
                (0..4).any(|i| (quarter[i] - s0[i]).abs() > 1e-3),
            );
            let mut all_non_negative = true;
            let mut t = 0.0;
            while t < lc.period() {
                if lc.state_at(t).iter().any(|&x| x < 0.0) {
                    all_non_negative = false;
                }
                t += 0.1;
            }
            v.check_true("cycle states non-negative", all_non_negative);

            v.section("── determinism ──");
            match LimitCycle::find(&params, &opts) {
                Ok(again) => v.check(
                    "repeat search period (bit-identical)",
                    again.period(),
                    lc.period(),
                    tolerances::EXACT,
                ),
                Err(e) => v.check_true(&format!("repeat search: {e}"), false),
            }
        }
        Err(e) => v.check_true(&format!("limit-cycle search: {e}"), false),
    }

    v.section("── coupling weights ──");
    for kav in [0.1, 0.5, 1.0, 2.0, 10.0] {
        let (ar, vr) = coupling_weights(kav);
        v.check(
            &format!("ar + vr at kav = {kav}"),
            ar + vr,
            1.0,
            tolerances::EXACT,
        );
    }
    let (ar, vr) = coupling_weights(1.0);
    v.check("balanced ar", ar, 0.5, tolerances::ANALYTICAL_F64);
    v.check("balanced vr", vr, 0.5, tolerances::ANALYTICAL_F64);

    v.section("── failure modes ──");
    let flat = GonzeParams {
        n: 1.0,
        ..GonzeParams::default()
    };
    v.check_true(
        "Hill coefficient 1 reported as non-convergent",
        LimitCycle::find(&flat, &opts).is_err(),
    );

    v.finish()
}
