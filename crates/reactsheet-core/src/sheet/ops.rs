use super::Sheet;
use super::state::SheetState;
use crate::error::{Result, SheetError};
use reactsheet_engine::engine::{CellRef, extract_dependencies};
use tracing::debug;

impl SheetState {
    /// Rewrite a cell's definition and rewire its outgoing edges.
    pub(crate) fn set(&mut self, target: &CellRef, raw: &str) {
        let raw = raw.trim();

        // Tear down stale edges before re-parsing.
        let stale = std::mem::take(&mut self.ensure(target).deps);
        for dep in &stale {
            if let Some(cell) = self.grid.get_mut(dep) {
                cell.dependents.remove(target);
            }
        }

        let cell = self.ensure(target);
        cell.raw = raw.to_string();
        cell.dirty = true;

        let deps = extract_dependencies(raw);
        for dep in &deps {
            self.ensure(dep).dependents.insert(target.clone());
        }
        debug!(cell = %target, raw, ?deps, "cell set");
        self.ensure(target).deps = deps.into_iter().collect();

        self.mark_dependents_dirty(target);
    }

    /// Mark every transitive dependent of `changed` dirty. Stops at cells
    /// that are already dirty, which also bounds the walk on cyclic graphs.
    fn mark_dependents_dirty(&mut self, changed: &CellRef) {
        let mut to_process: Vec<CellRef> = match self.grid.get(changed) {
            Some(cell) => cell.dependents.iter().cloned().collect(),
            None => return,
        };
        let mut marked = 0usize;

        while let Some(cell_ref) = to_process.pop() {
            let Some(cell) = self.grid.get_mut(&cell_ref) else {
                continue;
            };
            if cell.dirty {
                continue;
            }
            cell.dirty = true;
            marked += 1;
            to_process.extend(cell.dependents.iter().cloned());
        }

        if marked > 0 {
            debug!(cell = %changed, marked, "dependents invalidated");
        }
    }
}

impl Sheet {
    /// Set a cell's definition: a literal, or `=` followed by a formula.
    ///
    /// Fails without touching the grid if `reference` is not a valid cell
    /// name. No evaluation happens here; dependents are only marked dirty.
    pub fn set(&self, reference: &str, raw: &str) -> Result<()> {
        let target = parse_reference(reference)?;
        self.write().set(&target, raw);
        Ok(())
    }

    /// Apply several definitions under one write lock.
    ///
    /// Every reference is validated first; on error nothing is applied.
    pub fn set_many<I, R, S>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (R, S)>,
        R: AsRef<str>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(reference, raw)| -> Result<(CellRef, S)> {
                Ok((parse_reference(reference.as_ref())?, raw))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut state = self.write();
        for (target, raw) in &entries {
            state.set(target, raw.as_ref());
        }
        Ok(())
    }
}

fn parse_reference(reference: &str) -> Result<CellRef> {
    CellRef::parse(reference).ok_or_else(|| SheetError::InvalidReference(reference.to_string()))
}
