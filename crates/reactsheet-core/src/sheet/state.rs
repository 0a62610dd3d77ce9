use reactsheet_engine::engine::{Cell, CellRef, Grid};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Counters describing a sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SheetStats {
    /// Cells in the grid, including blank cells created as dependencies.
    pub cells: usize,
    /// Total cell recomputations performed by reads so far.
    pub evaluations: u64,
}

/// Grid plus counters, guarded as one unit by the sheet lock.
#[derive(Debug, Default)]
pub(crate) struct SheetState {
    pub(crate) grid: Grid,
    pub(crate) evaluations: u64,
}

impl SheetState {
    /// Look up a cell, creating a blank dirty one if absent.
    pub(crate) fn ensure(&mut self, cell_ref: &CellRef) -> &mut Cell {
        self.grid.entry(cell_ref.clone()).or_default()
    }
}

/// A reactive sheet of named cells.
///
/// All state sits behind one sheet-wide read/write lock. Edits hold the write
/// lock for their whole body. Reads of clean cells only need the read lock;
/// a read that has to recompute anything takes the write lock, so memoized
/// writes are never visible half-done.
#[derive(Debug, Default)]
pub struct Sheet {
    state: RwLock<SheetState>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    // No operation panics while holding the lock, so a poisoned lock still
    // guards a consistent grid.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, SheetState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, SheetState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The trimmed definition of a cell, if the cell exists.
    pub fn raw(&self, reference: &str) -> Option<String> {
        let cell_ref = CellRef::parse(reference)?;
        self.read().grid.get(&cell_ref).map(|cell| cell.raw.clone())
    }

    /// References the cell's formula reads, sorted.
    pub fn dependencies(&self, reference: &str) -> Vec<CellRef> {
        self.edges(reference, |cell| &cell.deps)
    }

    /// References whose formulas read this cell, sorted.
    pub fn dependents(&self, reference: &str) -> Vec<CellRef> {
        self.edges(reference, |cell| &cell.dependents)
    }

    fn edges(
        &self,
        reference: &str,
        pick: impl Fn(&Cell) -> &std::collections::BTreeSet<CellRef>,
    ) -> Vec<CellRef> {
        let Some(cell_ref) = CellRef::parse(reference) else {
            return Vec::new();
        };
        self.read()
            .grid
            .get(&cell_ref)
            .map(|cell| pick(cell).iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether the cell's cached value is stale. None if the cell does not exist.
    pub fn is_dirty(&self, reference: &str) -> Option<bool> {
        let cell_ref = CellRef::parse(reference)?;
        self.read().grid.get(&cell_ref).map(|cell| cell.dirty)
    }

    /// Every reference in the grid, sorted.
    pub fn references(&self) -> Vec<CellRef> {
        let mut refs: Vec<CellRef> = self.read().grid.keys().cloned().collect();
        refs.sort();
        refs
    }

    /// Non-blank cell definitions, sorted by reference.
    pub fn definitions(&self) -> Vec<(CellRef, String)> {
        let state = self.read();
        let mut defs: Vec<(CellRef, String)> = state
            .grid
            .iter()
            .filter(|(_, cell)| !cell.raw.is_empty())
            .map(|(cell_ref, cell)| (cell_ref.clone(), cell.raw.clone()))
            .collect();
        defs.sort_by(|a, b| a.0.cmp(&b.0));
        defs
    }

    pub fn len(&self) -> usize {
        self.read().grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().grid.is_empty()
    }

    pub fn stats(&self) -> SheetStats {
        let state = self.read();
        SheetStats {
            cells: state.grid.len(),
            evaluations: state.evaluations,
        }
    }
}
