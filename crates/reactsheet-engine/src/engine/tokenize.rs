//! Formula tokenizer and dependency extraction.
//!
//! The tokenizer is a flat scanner: each of `+ - * /` becomes a
//! single-character operator token and everything between operators becomes
//! one trimmed operand token. There is no precedence, grouping, or unary
//! minus, so only `<operand> <op> <operand>` (or a lone operand) evaluates.

use super::cell::FORMULA_MARKER;
use super::cell_ref::CellRef;

pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Split a formula body into alternating operand and operator tokens.
pub fn tokenize(expr: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for ch in expr.chars() {
        if OPERATORS.contains(&ch) {
            push_operand(&mut out, &current);
            current.clear();
            out.push(ch.to_string());
        } else {
            current.push(ch);
        }
    }
    push_operand(&mut out, &current);

    out
}

fn push_operand(out: &mut Vec<String>, operand: &str) {
    let operand = operand.trim();
    if !operand.is_empty() {
        out.push(operand.to_string());
    }
}

/// Extract the references a cell definition reads. Literals have none.
pub fn extract_dependencies(raw: &str) -> Vec<CellRef> {
    let Some(formula) = raw.trim().strip_prefix(FORMULA_MARKER) else {
        return Vec::new();
    };

    let mut deps: Vec<CellRef> = tokenize(formula)
        .iter()
        .filter_map(|token| CellRef::parse(token))
        .collect();
    deps.sort();
    deps.dedup();
    deps
}
