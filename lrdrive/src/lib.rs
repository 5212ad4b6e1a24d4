//! A table-driven LALR(1) parsing engine.
//!
//! `lrdrive` runs parse tables produced offline by a yacc-style generator.
//! A grammar plugs in three things:
//!
//! - a [`Tables`] set describing rules and automaton states,
//! - a [`Scanner`] supplying terminals with their values and locations,
//! - an [`Actions`] implementation holding the semantic actions.
//!
//! [`Engine::parse`] then drives the shift-reduce loop, synthesizes a
//! location for every reduced rule through [`Merge`], and recovers from
//! syntax errors via rules that mention the grammar's error terminal.
//!
//! ```rust
//! use lrdrive::{
//!     Action, Actions, Control, Engine, Nonterminal, Reduction, Rule, RuleId, Scanner, State,
//!     Symbol, Tables, Terminal,
//! };
//! use std::ops::Range;
//!
//! // $accept -> S $end, S -> x
//! let tables = Tables::builder()
//!     .rule(Rule::new(
//!         Nonterminal(0),
//!         vec![Symbol::Nonterminal(Nonterminal(1)), Symbol::Terminal(Terminal(1))],
//!     ))
//!     .rule(Rule::new(Nonterminal(1), vec![Symbol::Terminal(Terminal(3))]))
//!     .state(
//!         State::builder()
//!             .on(Terminal(3), Action::Shift(lrdrive::StateId(1)))
//!             .build(),
//!     )
//!     .state(
//!         State::builder()
//!             .on(Terminal(1), Action::Reduce(RuleId(1)))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(tables.expected(tables.start_state()), vec![Terminal(3)]);
//!
//! // Tokens carry the value 21 and their index as location.
//! struct Tokens {
//!     tokens: Vec<Terminal>,
//!     next: usize,
//! }
//!
//! impl Scanner for Tokens {
//!     type Value = u32;
//!     type Span = Range<usize>;
//!
//!     fn next_token(&mut self) -> Terminal {
//!         let token = self.tokens.get(self.next).copied().unwrap_or(Terminal(1));
//!         self.next += 1;
//!         token
//!     }
//!
//!     fn value(&mut self) -> u32 {
//!         21
//!     }
//!
//!     fn span(&self) -> Range<usize> {
//!         self.next.saturating_sub(1)..self.next
//!     }
//!
//!     fn report_error(&mut self, message: &str, span: &Range<usize>) {
//!         eprintln!("{span:?}: {message}");
//!     }
//! }
//!
//! struct Double;
//!
//! impl Actions for Double {
//!     type Value = u32;
//!     type Span = Range<usize>;
//!
//!     fn reduce(&mut self, reduction: Reduction<'_, u32, Range<usize>>, value: &mut u32) -> Control {
//!         *value = reduction.values[0] * 2;
//!         Control::Continue
//!     }
//! }
//!
//! let scanner = Tokens { tokens: vec![Terminal(3)], next: 0 };
//! let mut engine = Engine::new(&tables, scanner, Double);
//! assert_eq!(engine.parse(), Ok(42));
//! assert_eq!(engine.stats().shifts, 1);
//! ```

mod engine;
mod error;
mod scanner;
mod span;
mod stack;
mod table;

#[cfg(test)]
mod test_grammar;

pub use crate::engine::{
    Actions, Control, DEFAULT_MAX_DEPTH, Engine, ParserStats, RECOVERY_SHIFTS, Reduction,
};
pub use crate::error::{ParseError, TableError};
pub use crate::scanner::Scanner;
pub use crate::span::{Merge, Position, Span};
pub use crate::stack::Stack;
pub use crate::table::{
    Action, ActionCode, Nonterminal, Rule, RuleId, State, StateBuilder, StateId, Symbol, Tables,
    TablesBuilder, Terminal,
};
