// SPDX-License-Identifier: AGPL-3.0-or-later
//! Seeded PRNG for reproducible simulation.
//!
//! A Lehmer-style 64-bit LCG (Knuth's constants). Deterministic and
//! dependency-free so that a fixed (configuration, seed) pair yields a
//! bit-identical trajectory on every platform. Not cryptographic,
//! purely for simulation.

/// Deterministic 64-bit LCG.
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    const MULT: u64 = 6_364_136_223_846_793_005;
    const INC: u64 = 1_442_695_040_888_963_407;

    /// Create a new LCG seeded with the given value.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(Self::MULT).wrapping_add(Self::INC),
        }
    }

    /// Advance state and return raw `u64`.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(Self::MULT).wrapping_add(Self::INC);
        self.state
    }

    /// Uniform `f64` in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / ((1_u64 << 53) as f64)
    }

    /// Exponential variate with rate `lambda` (mean `1/lambda`), via the
    /// inverse CDF `-ln(U) / lambda`.
    pub fn exp_variate(&mut self, lambda: f64) -> f64 {
        let u = self.next_f64();
        let u_clamped = if u == 0.0 { f64::MIN_POSITIVE } else { u };
        -u_clamped.ln() / lambda
    }
}
