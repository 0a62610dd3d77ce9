//! reactsheet_engine - Cell references, formula tokenizer and lazy evaluator.

pub mod engine;
