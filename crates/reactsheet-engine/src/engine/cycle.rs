//! Re-entrancy tracking for formula evaluation.
//!
//! Every read starts a fresh [`EvalContext`] and threads it through the
//! recursive evaluator. A reference that is reached again while it is still
//! on the context's path closes a cycle. The evaluator then unwinds with a
//! [`CycleError`] until it gets back to the frame that closed it.

use std::fmt;

use super::cell_ref::CellRef;

/// Raised while unwinding through the members of a reference cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleError {
    /// The reference that was re-entered.
    pub at: CellRef,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle at {}", self.at)
    }
}

impl std::error::Error for CycleError {}

/// Per-read evaluation state.
#[derive(Debug, Default)]
pub struct EvalContext {
    path: Vec<CellRef>,
    cycles: Vec<CellRef>,
    evaluations: u64,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `cell_ref` is currently being evaluated further up the stack.
    pub fn on_path(&self, cell_ref: &CellRef) -> bool {
        self.path.contains(cell_ref)
    }

    pub(crate) fn enter(&mut self, cell_ref: &CellRef) {
        self.path.push(cell_ref.clone());
        self.evaluations += 1;
    }

    pub(crate) fn leave(&mut self, cell_ref: &CellRef) {
        if let Some(pos) = self.path.iter().rposition(|r| r == cell_ref) {
            self.path.remove(pos);
        }
    }

    /// Of two cycles being unwound, keep the one closing furthest up the path.
    pub(crate) fn outermost(&self, a: CycleError, b: CycleError) -> CycleError {
        let depth = |err: &CycleError| self.path.iter().position(|r| *r == err.at);
        match (depth(&a), depth(&b)) {
            (Some(da), Some(db)) if db < da => b,
            (None, Some(_)) => b,
            _ => a,
        }
    }

    pub(crate) fn record_cycle(&mut self, at: CellRef) {
        if !self.cycles.contains(&at) {
            self.cycles.push(at);
        }
    }

    /// The references at which cycles closed during this read, in order.
    pub fn cycles(&self) -> &[CellRef] {
        &self.cycles
    }

    /// Number of cells recomputed during this read.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_enter_and_leave_restore_path() {
        let mut ctx = EvalContext::new();
        ctx.enter(&r("A1"));
        ctx.enter(&r("B1"));
        assert!(ctx.on_path(&r("A1")));
        assert_eq!(ctx.depth(), 2);
        ctx.leave(&r("B1"));
        ctx.leave(&r("A1"));
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.evaluations(), 2);
    }

    #[test]
    fn test_outermost_prefers_earlier_path_entry() {
        let mut ctx = EvalContext::new();
        ctx.enter(&r("A1"));
        ctx.enter(&r("B1"));
        ctx.enter(&r("C1"));
        let inner = CycleError { at: r("B1") };
        let outer = CycleError { at: r("A1") };
        assert_eq!(ctx.outermost(inner.clone(), outer.clone()), outer);
        assert_eq!(ctx.outermost(outer.clone(), inner), outer);
    }

    #[test]
    fn test_record_cycle_dedups() {
        let mut ctx = EvalContext::new();
        ctx.record_cycle(r("A1"));
        ctx.record_cycle(r("A1"));
        assert_eq!(ctx.cycles(), &[r("A1")]);
    }
}
