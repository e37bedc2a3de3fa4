// SPDX-License-Identifier: AGPL-3.0-or-later
//! Kinetic parameters of the Gonze SCN oscillator.
//!
//! The model is a Goodwin-type negative-feedback oscillator (Gonze et al.
//! 2005) extended with a fourth output stage (AVP or VIP release) and a
//! paracrine coupling input. All 18 constants are shared by every cell;
//! only the Stage-1 degradation rate may be overridden per cell.
//!
//! # References
//!
//! - Gonze, D. et al. "Spontaneous synchronization of coupled circadian
//!   oscillators." *Biophys J* 89, 120–129 (2005).
//! - Goodwin, B.C. "Oscillatory behavior in enzymatic control processes."
//!   *Adv Enzyme Regul* 3, 425–438 (1965).

use crate::error::{Error, Result};

/// Number of f64 parameters when flattened.
pub const N_PARAMS: usize = 18;

/// Leaky-knockout scale applied to a Bmal1-knockout population's Stage-1
/// production term.
///
/// Strictly positive and small: the term is attenuated, never removed,
/// which keeps the Hill expression away from its 0/0 singularity.
pub const BMALKO_LEAK: f64 = 0.01;

/// Kinetic constants for one Gonze oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GonzeParams {
    /// Maximal Stage-1 (clock gene) transcription rate.
    pub v1: f64,
    /// Half-saturation constant of the Hill repression by Z.
    pub k1: f64,
    /// Hill coefficient of the transcriptional repression.
    pub n: f64,
    /// Stage-1 maximal degradation rate. Also the default per-cell `p3`.
    pub v2: f64,
    /// Half-saturation constant of Stage-1 degradation.
    pub k2: f64,
    /// Stage-2 production rate (translation of X into Y).
    pub k3: f64,
    /// Stage-2 maximal degradation rate.
    pub v4: f64,
    /// Half-saturation constant of Stage-2 degradation.
    pub k4: f64,
    /// Stage-3 production rate (activation of the repressor Z by Y).
    pub k5: f64,
    /// Stage-3 maximal degradation rate.
    pub v6: f64,
    /// Half-saturation constant of Stage-3 degradation.
    pub k6: f64,
    /// Output-stage production rate (AVP/VIP release driven by X).
    pub k7: f64,
    /// Output-stage maximal degradation rate.
    pub v8: f64,
    /// Half-saturation constant of output degradation.
    pub k8: f64,
    /// Maximal coupling input rate on every cell's X equation.
    pub vc: f64,
    /// Half-saturation constant of the coupling input.
    pub kc: f64,
    /// Coupling gain applied to the mean-field signal.
    pub k: f64,
    /// Light input (0 in constant darkness; kept for completeness).
    pub l: f64,
}

impl Default for GonzeParams {
    /// Published wild-type parameter set (period ≈ 30.27 h).
    fn default() -> Self {
        Self {
            v1: 0.7,
            k1: 1.0,
            n: 4.0,
            v2: 0.35,
            k2: 1.0,
            k3: 0.7,
            v4: 0.35,
            k4: 1.0,
            k5: 0.7,
            v6: 0.35,
            k6: 1.0,
            k7: 0.35,
            v8: 1.0,
            k8: 1.0,
            vc: 0.4,
            kc: 1.0,
            k: 0.75,
            l: 0.0,
        }
    }
}

impl GonzeParams {
    /// Flatten into the canonical `[v1, K1, n, v2, K2, k3, v4, K4, k5,
    /// v6, K6, k7, v8, K8, vc, Kc, K, L]` order.
    #[must_use]
    pub fn to_flat(&self) -> [f64; N_PARAMS] {
        [
            self.v1, self.k1, self.n, self.v2, self.k2, self.k3, self.v4, self.k4, self.k5,
            self.v6, self.k6, self.k7, self.v8, self.k8, self.vc, self.kc, self.k, self.l,
        ]
    }

    /// Reconstruct from a flat slice (inverse of [`to_flat`](Self::to_flat)).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the slice length is not exactly
    /// [`N_PARAMS`].
    pub fn from_flat(flat: &[f64]) -> Result<Self> {
        if flat.len() != N_PARAMS {
            return Err(Error::Config(format!(
                "parameter vector must have {N_PARAMS} entries, got {}",
                flat.len()
            )));
        }
        Ok(Self {
            v1: flat[0],
            k1: flat[1],
            n: flat[2],
            v2: flat[3],
            k2: flat[4],
            k3: flat[5],
            v4: flat[6],
            k4: flat[7],
            k5: flat[8],
            v6: flat[9],
            k6: flat[10],
            k7: flat[11],
            v8: flat[12],
            k8: flat[13],
            vc: flat[14],
            kc: flat[15],
            k: flat[16],
            l: flat[17],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_published_values() {
        let p = GonzeParams::default();
        let flat = p.to_flat();
        let expected: [f64; N_PARAMS] = [
            0.7, 1.0, 4.0, 0.35, 1.0, 0.7, 0.35, 1.0, 0.7, 0.35, 1.0, 0.35, 1.0, 1.0, 0.4, 1.0,
            0.75, 0.0,
        ];
        for (i, (a, e)) in flat.iter().zip(&expected).enumerate() {
            assert_eq!(a.to_bits(), e.to_bits(), "parameter {i} differs");
        }
    }

    #[test]
    fn flat_round_trip() {
        let p = GonzeParams::default();
        let flat = p.to_flat();
        let p2 = GonzeParams::from_flat(&flat).unwrap();
        assert_eq!(p, p2);
    }

    #[test]
    fn from_flat_rejects_wrong_length() {
        let short = [0.7; 17];
        assert!(GonzeParams::from_flat(&short).is_err());
        let long = [0.7; 19];
        assert!(GonzeParams::from_flat(&long).is_err());
    }

    #[test]
    fn bmalko_leak_is_small_but_positive() {
        assert!(BMALKO_LEAK > 0.0);
        assert!(BMALKO_LEAK < 0.05);
    }
}
