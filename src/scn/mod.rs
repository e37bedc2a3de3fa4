// SPDX-License-Identifier: AGPL-3.0-or-later
//! Multicellular SCN simulation engine.
//!
//! The network is a flat state buffer with an index-based arena
//! ([`cell::NetworkLayout`]) mapping each cell of each population to its
//! contiguous variable block: AVP cells first, then VIP, then NAV.
//! [`network::ScnModel`] evaluates the coupled kinetics over that buffer
//! and advances the system either deterministically ([`ode`]) or
//! stochastically ([`ssa`]).

pub mod cell;
pub mod config;
pub mod limit_cycle;
pub mod network;
pub mod ode;
pub mod rng;
pub mod ssa;
pub mod sweep;
pub mod trajectory;

pub use cell::{CellCounts, CellType, NetworkLayout};
pub use config::{InitialState, Knockout, ScnConfig};
pub use limit_cycle::{LimitCycle, PeriodOptions};
pub use network::{coupling_weights, ScnModel};
pub use sweep::{Genotype, SweepOptions, SweepPoint, SweepRun};
pub use trajectory::Trajectory;
