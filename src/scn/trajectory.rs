// SPDX-License-Identifier: AGPL-3.0-or-later
//! Simulation output: a dense time grid with one row of concentrations
//! per report point, plus numerical-instability counters.

use super::cell::{CellType, NetworkLayout};

/// Recorded trajectory of one run.
///
/// Rows are stored flat, row-major: `n_points` rows of `n_states`
/// concentrations each, with the matching time in `times`. Logically a
/// row has `n_states + 1` columns counting time.
#[derive(Debug, Clone)]
pub struct Trajectory {
    layout: NetworkLayout,
    times: Vec<f64>,
    states: Vec<f64>,
    clamp_events: u64,
}

impl Trajectory {
    /// Empty trajectory with room for `n_points` rows.
    #[must_use]
    pub fn with_capacity(layout: NetworkLayout, n_points: usize) -> Self {
        Self {
            layout,
            times: Vec::with_capacity(n_points),
            states: Vec::with_capacity(n_points * layout.n_states()),
            clamp_events: 0,
        }
    }

    /// Append one report row.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not match the layout's state count.
    pub fn push_row(&mut self, t: f64, state: &[f64]) {
        assert_eq!(state.len(), self.layout.n_states(), "row length mismatch");
        self.times.push(t);
        self.states.extend_from_slice(state);
    }

    /// Record negative-value clamps observed during integration.
    pub fn add_clamp_events(&mut self, n: u64) {
        self.clamp_events += n;
    }

    /// Number of clamped negative values encountered. Zero for a
    /// numerically clean run.
    #[must_use]
    pub const fn clamp_events(&self) -> u64 {
        self.clamp_events
    }

    /// The layout the rows are indexed by.
    #[must_use]
    pub const fn layout(&self) -> &NetworkLayout {
        &self.layout
    }

    /// Number of report rows.
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.times.len()
    }

    /// State variables per row.
    #[must_use]
    pub const fn n_states(&self) -> usize {
        self.layout.n_states()
    }

    /// Logical column count, time included.
    #[must_use]
    pub const fn n_columns(&self) -> usize {
        self.layout.n_states() + 1
    }

    /// Report times (hours).
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// One report row of concentrations.
    ///
    /// # Panics
    ///
    /// Panics if `point` is out of range.
    #[must_use]
    pub fn state_row(&self, point: usize) -> &[f64] {
        let n = self.layout.n_states();
        &self.states[point * n..(point + 1) * n]
    }

    /// The last recorded row, if any.
    #[must_use]
    pub fn final_state(&self) -> Option<&[f64]> {
        self.n_points().checked_sub(1).map(|i| self.state_row(i))
    }

    /// Iterate `(time, row)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        let n = self.layout.n_states();
        self.times
            .iter()
            .copied()
            .zip(self.states.chunks_exact(n))
    }

    /// Mean of one variable over a population at one report point.
    /// `None` when the population is empty.
    #[must_use]
    pub fn population_mean(&self, point: usize, ty: CellType, var: usize) -> Option<f64> {
        let count = self.layout.counts().of(ty);
        if count == 0 || var >= ty.n_vars() {
            return None;
        }
        let row = self.state_row(point);
        let start = self.layout.block_start(ty);
        let stride = ty.n_vars();
        let mut sum = 0.0;
        for i in 0..count {
            sum += row[start + i * stride + var];
        }
        #[allow(clippy::cast_precision_loss)]
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scn::cell::{CellCounts, VAR_X};

    fn layout() -> NetworkLayout {
        NetworkLayout::new(CellCounts {
            avp: 2,
            vip: 1,
            nav: 2,
        })
    }

    #[test]
    fn rows_round_trip() {
        let layout = layout();
        let mut traj = Trajectory::with_capacity(layout, 3);
        let n = layout.n_states();
        for p in 0..3 {
            let row: Vec<f64> = (0..n).map(|i| (p * n + i) as f64).collect();
            traj.push_row(p as f64 * 0.5, &row);
        }
        assert_eq!(traj.n_points(), 3);
        assert_eq!(traj.n_columns(), n + 1);
        assert_eq!(traj.times(), &[0.0, 0.5, 1.0]);
        assert_eq!(traj.state_row(1)[0], n as f64);
        assert_eq!(traj.final_state().unwrap()[n - 1], (3 * n - 1) as f64);
        assert_eq!(traj.rows().count(), 3);
    }

    #[test]
    fn population_mean_uses_block_stride() {
        let layout = layout();
        let mut traj = Trajectory::with_capacity(layout, 1);
        let mut row = vec![0.0; layout.n_states()];
        // Two AVP cells: X at offsets 0 and 4.
        row[0] = 1.0;
        row[4] = 3.0;
        traj.push_row(0.0, &row);
        let mean = traj.population_mean(0, CellType::Avp, VAR_X).unwrap();
        assert!((mean - 2.0).abs() < 1e-15);
    }

    #[test]
    fn empty_population_mean_is_none() {
        let layout = NetworkLayout::new(CellCounts {
            avp: 0,
            vip: 1,
            nav: 0,
        });
        let mut traj = Trajectory::with_capacity(layout, 1);
        traj.push_row(0.0, &vec![0.5; layout.n_states()]);
        assert!(traj.population_mean(0, CellType::Avp, VAR_X).is_none());
    }

    #[test]
    fn out_of_range_variable_is_none() {
        let layout = layout();
        let mut traj = Trajectory::with_capacity(layout, 1);
        traj.push_row(0.0, &vec![0.1; layout.n_states()]);
        // NAV cells have three variables; index 3 does not exist.
        assert!(traj.population_mean(0, CellType::Nav, 3).is_none());
    }

    #[test]
    fn clamp_events_accumulate() {
        let mut traj = Trajectory::with_capacity(layout(), 0);
        assert_eq!(traj.clamp_events(), 0);
        traj.add_clamp_events(2);
        traj.add_clamp_events(3);
        assert_eq!(traj.clamp_events(), 5);
    }
}
