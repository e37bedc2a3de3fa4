// SPDX-License-Identifier: AGPL-3.0-or-later
//! circadia: multicellular simulation of the SCN circadian network.
//!
//! Models the suprachiasmatic nucleus as a population of coupled Gonze
//! oscillators split into three cell types (AVP, VIP, and non-AVP/VIP
//! "NAV" cells) that communicate through a shared paracrine mean-field
//! signal. The engine supports:
//!
//! - deterministic RK4 integration of the coupled ODE network,
//! - exact stochastic simulation (Gillespie direct method) of the
//!   equivalent birth–death reaction network,
//! - simulated genetic perturbations (Bmal1 knockout of the core loop,
//!   output knockout) and coupling-strength / cell-ratio reweighting,
//! - parameter sweeps over coupling ratio and population mix, run in
//!   parallel across replicates.
//!
//! Every run is bit-reproducible for a fixed configuration and seed.

pub mod error;
pub mod params;
pub mod scn;
pub mod tolerances;
pub mod validation;

pub use error::{Error, Result};
