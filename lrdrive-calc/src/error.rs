//! # Calculator Error Type
//!
//! [`CalcError`] covers both setup failures (building the scanner automaton
//! or the parse tables) and the ways evaluating a program can go wrong.
//! Semantic errors the parser recovers from, such as an undefined variable,
//! are collected in [`Evaluation::errors`](crate::Evaluation::errors); a
//! parse that ends early reports its cause in
//! [`Evaluation::outcome`](crate::Evaluation::outcome).
use lrdrive::{ParseError, Span, TableError};
use smartstring::alias::String;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    /// The scanner's pattern set failed to compile.
    #[error("unable to build scanner: {0}")]
    Regex(#[from] regex_automata::dfa::dense::BuildError),

    /// The calculator's parse tables are inconsistent.
    #[error("invalid parse tables: {0}")]
    Tables(#[from] TableError),

    /// The parse ended without accepting.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{span}: undefined variable `{name}`")]
    Undefined { name: String, span: Span },

    #[error("{span}: arithmetic overflow")]
    Overflow { span: Span },

    /// Evaluation cannot continue; the parse is aborted.
    #[error("{span}: division by zero")]
    DivisionByZero { span: Span },
}
