use super::Sheet;
use crate::error::{Result, SheetError};
use reactsheet_engine::engine::{CellRef, ErrorCode, EvalContext, Value, evaluate, format_value};
use tracing::{debug, trace};

impl Sheet {
    /// Read a cell, evaluating it (and any dirty dependency) if needed.
    ///
    /// Cells that were never mentioned read as blank text. If a cycle is
    /// detected during this read, the result is [`SheetError::Cycle`]
    /// carrying the cell's computed value; the value stays cached, so the
    /// next read returns it without re-deriving the cycle.
    pub fn get(&self, reference: &str) -> Result<Value> {
        let Some(target) = CellRef::parse(reference) else {
            return Ok(Value::blank());
        };

        {
            let state = self.read();
            match state.grid.get(&target) {
                None => return Ok(Value::blank()),
                Some(cell) if !cell.dirty => {
                    trace!(cell = %target, "clean read");
                    return Ok(cell.value.clone());
                }
                Some(_) => {}
            }
        }

        let mut state = self.write();
        let mut ctx = EvalContext::new();
        let result = evaluate(&mut state.grid, &target, &mut ctx);
        state.evaluations += ctx.evaluations();
        debug!(cell = %target, evaluations = ctx.evaluations(), "evaluated");

        // The requested cell is the outermost frame, so every cycle closes
        // at or below it and `evaluate` returns Ok here.
        let (value, closed_at) = match result {
            Ok(value) => (value, ctx.cycles().first().cloned()),
            Err(cycle) => (Value::Error(ErrorCode::Cycle), Some(cycle.at)),
        };

        match closed_at {
            Some(at) => Err(SheetError::Cycle { at, value }),
            None => Ok(value),
        }
    }

    /// Read a cell and format it for display. Cycle errors render their value.
    pub fn get_display(&self, reference: &str) -> String {
        match self.get(reference) {
            Ok(value) | Err(SheetError::Cycle { value, .. }) => format_value(&value),
            Err(_) => format_value(&Value::Error(ErrorCode::Err)),
        }
    }
}
