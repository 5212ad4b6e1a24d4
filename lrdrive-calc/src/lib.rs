//! # lrdrive-calc
//!
//! A small integer calculator built on **lrdrive**, showing a complete
//! scanner, table set and semantic-action pipeline, including error
//! recovery.
//!
//! ## Overview
//!
//! - [`lexer`]: a `regex-automata` scanner ([`CalcLexer`]) producing
//!   [`TokenValue`]s with line/column [`Span`](lrdrive::Span)s.
//! - [`parser_data`]: the LALR(1) tables of the calculator grammar.
//! - [`parser`]: the semantic actions and the [`CalcParser`] front end.
//! - [`symtab`]: variable storage ([`SymTab`]).
//!
//! ## Example
//!
//! ```rust
//! use lrdrive_calc::{CalcParser, SymTab};
//!
//! let parser = CalcParser::try_new().unwrap();
//! let mut symtab = SymTab::new();
//! let eval = parser.evaluate("a = 1 + 2 * 3; a - 10; b; a * 2;", &mut symtab);
//!
//! // `b` is undefined: that statement is skipped and evaluation goes on
//! assert_eq!(eval.values(), vec![Some(7), Some(-3), None, Some(14)]);
//! assert_eq!(eval.errors.len(), 1);
//! assert!(eval.outcome.is_ok());
//! ```
pub mod error;
pub mod lexer;
pub mod parser;
pub mod parser_data;
pub mod symtab;
pub mod token;

pub use error::CalcError;
pub use lexer::{CalcLexer, Diagnostic, Lexicon};
pub use parser::{CalcActions, CalcParser, Evaluation, Statement};
pub use parser_data::TokenID;
pub use symtab::SymTab;
pub use token::TokenValue;
