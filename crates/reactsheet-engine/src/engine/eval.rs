//! Lazy, memoized formula evaluation.
//!
//! [`evaluate`] recomputes a cell only while it is dirty, descending into
//! dirty dependencies first and caching every result it computes. Clean cells
//! are returned straight from their cache. Re-entering a cell that is still
//! being evaluated unwinds back to it, caching `#CYCLE!` in every cell on the
//! way. Cells reading the cycle from outside see an ordinary error value and
//! become `#ERR!`.

use tracing::{debug, trace, warn};

use super::cell::{ErrorCode, FORMULA_MARKER, Grid, Value};
use super::cell_ref::CellRef;
use super::cycle::{CycleError, EvalContext};
use super::tokenize::tokenize;

/// Evaluate `cell_ref`, recomputing it and any dirty dependency on the way.
///
/// Returns `Err` only while unwinding through the members of a cycle that
/// closes further up the current path. The frame that closes the cycle
/// records it in `ctx` and returns the `#CYCLE!` value as `Ok`.
pub fn evaluate(
    grid: &mut Grid,
    cell_ref: &CellRef,
    ctx: &mut EvalContext,
) -> Result<Value, CycleError> {
    let raw = match grid.get(cell_ref) {
        None => return Ok(Value::blank()),
        Some(cell) if !cell.dirty => {
            trace!(cell = %cell_ref, "cache hit");
            return Ok(cell.value.clone());
        }
        Some(cell) => cell.raw.clone(),
    };

    // The cell stays dirty so every other route back to it during this read
    // also hits the path check. The frame that closes the cycle caches it.
    if ctx.on_path(cell_ref) {
        warn!(cell = %cell_ref, "circular reference");
        return Err(CycleError {
            at: cell_ref.clone(),
        });
    }

    ctx.enter(cell_ref);
    let outcome = compute(grid, &raw, ctx);
    ctx.leave(cell_ref);

    match outcome {
        Ok(value) => {
            debug!(cell = %cell_ref, ?value, "recomputed");
            store(grid, cell_ref, value.clone());
            Ok(value)
        }
        Err(cycle) => {
            let value = Value::Error(ErrorCode::Cycle);
            store(grid, cell_ref, value.clone());
            if cycle.at == *cell_ref {
                ctx.record_cycle(cycle.at);
                Ok(value)
            } else {
                Err(cycle)
            }
        }
    }
}

fn store(grid: &mut Grid, cell_ref: &CellRef, value: Value) {
    if let Some(cell) = grid.get_mut(cell_ref) {
        cell.value = value;
        cell.dirty = false;
    }
}

fn compute(grid: &mut Grid, raw: &str, ctx: &mut EvalContext) -> Result<Value, CycleError> {
    let Some(formula) = raw.strip_prefix(FORMULA_MARKER) else {
        return Ok(Value::from_literal(raw));
    };

    let tokens = tokenize(formula);
    match tokens.as_slice() {
        [single] => Ok(match resolve_atom(grid, single, ctx)? {
            Some(Value::Error(_)) | None => Value::Error(ErrorCode::Err),
            Some(value) => value,
        }),
        [left, op, right] => {
            // Both sides are resolved even when one fails so that every
            // dependency is left clean.
            let lhs = resolve_atom(grid, left, ctx);
            let rhs = resolve_atom(grid, right, ctx);
            let (lhs, rhs) = match (lhs, rhs) {
                (Err(a), Err(b)) => return Err(ctx.outermost(a, b)),
                (Err(cycle), _) | (_, Err(cycle)) => return Err(cycle),
                (Ok(lhs), Ok(rhs)) => (lhs, rhs),
            };
            let lhs = lhs.as_ref().and_then(Value::as_number);
            let rhs = rhs.as_ref().and_then(Value::as_number);
            Ok(match (lhs, rhs) {
                (Some(l), Some(r)) => apply(op, l, r),
                _ => Value::Error(ErrorCode::Err),
            })
        }
        _ => Ok(Value::Error(ErrorCode::Err)),
    }
}

/// Resolve one operand. `Ok(None)` means the token is neither a reference
/// nor a number.
fn resolve_atom(
    grid: &mut Grid,
    token: &str,
    ctx: &mut EvalContext,
) -> Result<Option<Value>, CycleError> {
    if let Some(cell_ref) = CellRef::parse(token) {
        return evaluate(grid, &cell_ref, ctx).map(Some);
    }
    Ok(token.parse::<f64>().ok().map(Value::Number))
}

/// Apply a binary operator to two numbers.
pub fn apply(op: &str, l: f64, r: f64) -> Value {
    match op {
        "+" => Value::Number(l + r),
        "-" => Value::Number(l - r),
        "*" => Value::Number(l * r),
        "/" if r == 0.0 => Value::Error(ErrorCode::DivZero),
        "/" => Value::Number(l / r),
        _ => Value::Error(ErrorCode::Err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::extract_dependencies;

    fn r(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    /// Insert a dirty cell with edges wired, the way the sheet does it.
    fn put(grid: &mut Grid, name: &str, raw: &str) {
        let target = r(name);
        let deps = extract_dependencies(raw);
        for dep in &deps {
            grid.entry(dep.clone())
                .or_default()
                .dependents
                .insert(target.clone());
        }
        let cell = grid.entry(target).or_default();
        cell.raw = raw.to_string();
        cell.dirty = true;
        cell.deps = deps.into_iter().collect();
    }

    fn eval(grid: &mut Grid, name: &str) -> (Result<Value, CycleError>, EvalContext) {
        let mut ctx = EvalContext::new();
        let result = evaluate(grid, &r(name), &mut ctx);
        (result, ctx)
    }

    #[test]
    fn test_literals() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "5");
        put(&mut grid, "A2", "hello");
        assert_eq!(eval(&mut grid, "A1").0, Ok(Value::Number(5.0)));
        assert_eq!(eval(&mut grid, "A2").0, Ok(Value::Text("hello".into())));
    }

    #[test]
    fn test_missing_cell_is_blank() {
        let mut grid = Grid::new();
        assert_eq!(eval(&mut grid, "Z9").0, Ok(Value::blank()));
    }

    #[test]
    fn test_binary_operators() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "6");
        put(&mut grid, "B1", "3");
        put(&mut grid, "C1", "=A1+B1");
        put(&mut grid, "C2", "=A1-B1");
        put(&mut grid, "C3", "=A1*B1");
        put(&mut grid, "C4", "=A1/B1");
        put(&mut grid, "C5", "=A1 * 2");
        assert_eq!(eval(&mut grid, "C1").0, Ok(Value::Number(9.0)));
        assert_eq!(eval(&mut grid, "C2").0, Ok(Value::Number(3.0)));
        assert_eq!(eval(&mut grid, "C3").0, Ok(Value::Number(18.0)));
        assert_eq!(eval(&mut grid, "C4").0, Ok(Value::Number(2.0)));
        assert_eq!(eval(&mut grid, "C5").0, Ok(Value::Number(12.0)));
    }

    #[test]
    fn test_division_by_zero() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "1");
        put(&mut grid, "B1", "0");
        put(&mut grid, "C1", "=A1/B1");
        assert_eq!(
            eval(&mut grid, "C1").0,
            Ok(Value::Error(ErrorCode::DivZero))
        );
    }

    #[test]
    fn test_wrong_token_count_is_err() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "=1+2+3");
        put(&mut grid, "A2", "=");
        put(&mut grid, "A3", "=-5+3");
        for name in ["A1", "A2", "A3"] {
            assert_eq!(eval(&mut grid, name).0, Ok(Value::Error(ErrorCode::Err)));
        }
    }

    #[test]
    fn test_non_numeric_operand_is_err() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "text");
        put(&mut grid, "B1", "=A1+1");
        put(&mut grid, "B2", "=x+1");
        assert_eq!(eval(&mut grid, "B1").0, Ok(Value::Error(ErrorCode::Err)));
        assert_eq!(eval(&mut grid, "B2").0, Ok(Value::Error(ErrorCode::Err)));
    }

    #[test]
    fn test_error_values_propagate_as_err() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "=1/0");
        put(&mut grid, "B1", "=A1+1");
        assert_eq!(eval(&mut grid, "B1").0, Ok(Value::Error(ErrorCode::Err)));
        assert_eq!(grid[&r("A1")].value, Value::Error(ErrorCode::DivZero));
    }

    #[test]
    fn test_single_operand_passthrough() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "7");
        put(&mut grid, "A2", "label");
        put(&mut grid, "B1", "=A1");
        put(&mut grid, "B2", "=A2");
        put(&mut grid, "B3", "=4.5");
        assert_eq!(eval(&mut grid, "B1").0, Ok(Value::Number(7.0)));
        assert_eq!(eval(&mut grid, "B2").0, Ok(Value::Text("label".into())));
        assert_eq!(eval(&mut grid, "B3").0, Ok(Value::Number(4.5)));
    }

    #[test]
    fn test_memoized_cell_is_not_recomputed() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "2");
        put(&mut grid, "B1", "=A1*A1");
        let (_, first) = eval(&mut grid, "B1");
        assert_eq!(first.evaluations(), 2);
        let (value, second) = eval(&mut grid, "B1");
        assert_eq!(value, Ok(Value::Number(4.0)));
        assert_eq!(second.evaluations(), 0);
    }

    #[test]
    fn test_two_cell_cycle() {
        let mut grid = Grid::new();
        put(&mut grid, "B2", "=C2");
        put(&mut grid, "C2", "=B2");
        let (value, ctx) = eval(&mut grid, "B2");
        assert_eq!(value, Ok(Value::Error(ErrorCode::Cycle)));
        assert_eq!(ctx.cycles(), &[r("B2")]);
        assert_eq!(ctx.depth(), 0);
        assert_eq!(grid[&r("C2")].value, Value::Error(ErrorCode::Cycle));
        assert!(!grid[&r("B2")].dirty);
        assert!(!grid[&r("C2")].dirty);
    }

    #[test]
    fn test_self_reference() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "=A1+1");
        let (value, ctx) = eval(&mut grid, "A1");
        assert_eq!(value, Ok(Value::Error(ErrorCode::Cycle)));
        assert_eq!(ctx.cycles(), &[r("A1")]);
    }

    #[test]
    fn test_reader_outside_cycle_gets_err() {
        let mut grid = Grid::new();
        put(&mut grid, "B2", "=C2+1");
        put(&mut grid, "C2", "=B2+1");
        put(&mut grid, "D1", "=B2*2");
        let (value, ctx) = eval(&mut grid, "D1");
        assert_eq!(value, Ok(Value::Error(ErrorCode::Err)));
        assert_eq!(ctx.cycles(), &[r("B2")]);
        assert_eq!(grid[&r("B2")].value, Value::Error(ErrorCode::Cycle));
        assert_eq!(grid[&r("C2")].value, Value::Error(ErrorCode::Cycle));
    }

    #[test]
    fn test_cycle_leaves_other_operand_clean() {
        let mut grid = Grid::new();
        put(&mut grid, "A1", "=B1+C1");
        put(&mut grid, "B1", "=A1");
        put(&mut grid, "C1", "3");
        let (value, _) = eval(&mut grid, "A1");
        assert_eq!(value, Ok(Value::Error(ErrorCode::Cycle)));
        assert!(!grid[&r("C1")].dirty);
        assert_eq!(grid[&r("C1")].value, Value::Number(3.0));
    }

    #[test]
    fn test_every_route_back_to_a_cycle_member_is_a_cycle() {
        for entry in ["A1", "B1", "C1"] {
            let mut grid = Grid::new();
            put(&mut grid, "A1", "=B1+C1");
            put(&mut grid, "B1", "=A1");
            put(&mut grid, "C1", "=A1+1");
            let (value, ctx) = eval(&mut grid, entry);
            assert_eq!(value, Ok(Value::Error(ErrorCode::Cycle)));
            assert_eq!(ctx.cycles(), &[r(entry)]);
            for name in ["A1", "B1", "C1"] {
                assert_eq!(grid[&r(name)].value, Value::Error(ErrorCode::Cycle));
                assert!(!grid[&r(name)].dirty);
            }
        }
    }

    #[test]
    fn test_apply_unknown_operator() {
        assert_eq!(apply("%", 1.0, 2.0), Value::Error(ErrorCode::Err));
    }
}
