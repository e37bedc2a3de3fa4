// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cell types, population sizes, and the state-buffer arena.
//!
//! Each cell owns a contiguous run of state variables in one flat
//! buffer: `(X, Y, Z, A)` for AVP, `(X, Y, Z, V)` for VIP, `(X, Y, Z)`
//! for NAV. Populations are laid out back to back (AVP block, VIP
//! block, NAV block), each block ordered by cell index.

use std::ops::Range;

/// Offset of the X variable within a cell's block.
pub const VAR_X: usize = 0;
/// Offset of the Y variable within a cell's block.
pub const VAR_Y: usize = 1;
/// Offset of the Z (repressor) variable within a cell's block.
pub const VAR_Z: usize = 2;
/// Offset of the output variable (A for AVP, V for VIP). NAV cells have
/// no output stage.
pub const VAR_OUT: usize = 3;

/// The three modeled SCN subpopulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Arginine-vasopressin neurons: 4 states, output A feeds coupling.
    Avp,
    /// Vasoactive-intestinal-polypeptide neurons: 4 states, output V
    /// feeds coupling.
    Vip,
    /// Remaining SCN neurons: 3 states, consume coupling only.
    Nav,
}

impl CellType {
    /// Number of state variables per cell of this type.
    #[must_use]
    pub const fn n_vars(self) -> usize {
        match self {
            Self::Avp | Self::Vip => 4,
            Self::Nav => 3,
        }
    }

    /// Whether this population produces the paracrine output stage.
    #[must_use]
    pub const fn has_output(self) -> bool {
        matches!(self, Self::Avp | Self::Vip)
    }
}

/// Fixed population sizes for one model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCounts {
    /// Number of AVP cells.
    pub avp: usize,
    /// Number of VIP cells.
    pub vip: usize,
    /// Number of NAV cells.
    pub nav: usize,
}

impl Default for CellCounts {
    /// Standard 20/20/20 network used by the coupling-ratio experiments.
    fn default() -> Self {
        Self {
            avp: 20,
            vip: 20,
            nav: 20,
        }
    }
}

impl CellCounts {
    /// Anatomical cell counts used for the final full-SCN figure.
    pub const PAPER: Self = Self {
        avp: 53,
        vip: 27,
        nav: 170,
    };

    /// Total number of cells across all populations.
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.avp + self.vip + self.nav
    }

    /// Total number of state variables: `4·AVP + 4·VIP + 3·NAV`.
    #[must_use]
    pub const fn total_states(&self) -> usize {
        4 * self.avp + 4 * self.vip + 3 * self.nav
    }

    /// Population size for one cell type.
    #[must_use]
    pub const fn of(&self, ty: CellType) -> usize {
        match ty {
            CellType::Avp => self.avp,
            CellType::Vip => self.vip,
            CellType::Nav => self.nav,
        }
    }
}

/// Index arena mapping (population, cell index) to offsets in the flat
/// state buffer. Pure index arithmetic, no name lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkLayout {
    counts: CellCounts,
}

impl NetworkLayout {
    /// Build the layout for the given population sizes.
    #[must_use]
    pub const fn new(counts: CellCounts) -> Self {
        Self { counts }
    }

    /// Population sizes this layout was built for.
    #[must_use]
    pub const fn counts(&self) -> CellCounts {
        self.counts
    }

    /// Total length of the state buffer.
    #[must_use]
    pub const fn n_states(&self) -> usize {
        self.counts.total_states()
    }

    /// First state index of each population block.
    #[must_use]
    pub const fn block_start(&self, ty: CellType) -> usize {
        match ty {
            CellType::Avp => 0,
            CellType::Vip => 4 * self.counts.avp,
            CellType::Nav => 4 * self.counts.avp + 4 * self.counts.vip,
        }
    }

    /// Contiguous state-index range of one population block.
    #[must_use]
    pub const fn block_range(&self, ty: CellType) -> Range<usize> {
        let start = self.block_start(ty);
        start..start + self.counts.of(ty) * ty.n_vars()
    }

    /// State offset of cell `idx` of population `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range for the population.
    #[must_use]
    pub fn cell_offset(&self, ty: CellType, idx: usize) -> usize {
        assert!(idx < self.counts.of(ty), "cell index out of range");
        self.block_start(ty) + idx * ty.n_vars()
    }

    /// Global cell index (AVP cells first, then VIP, then NAV), used to
    /// address per-cell parameter overrides.
    #[must_use]
    pub const fn global_cell_index(&self, ty: CellType, idx: usize) -> usize {
        match ty {
            CellType::Avp => idx,
            CellType::Vip => self.counts.avp + idx,
            CellType::Nav => self.counts.avp + self.counts.vip + idx,
        }
    }

    /// Iterate `(type, cell index, state offset)` over every cell in
    /// block order.
    pub fn cells(&self) -> impl Iterator<Item = (CellType, usize, usize)> + '_ {
        let avp = (0..self.counts.avp).map(move |i| (CellType::Avp, i, 4 * i));
        let vip_start = self.block_start(CellType::Vip);
        let vip = (0..self.counts.vip).map(move |i| (CellType::Vip, i, vip_start + 4 * i));
        let nav_start = self.block_start(CellType::Nav);
        let nav = (0..self.counts.nav).map(move |i| (CellType::Nav, i, nav_start + 3 * i));
        avp.chain(vip).chain(nav)
    }
}
