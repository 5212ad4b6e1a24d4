//! Error types for table loading and parsing.
//!
//! Syntax errors a parse recovers from never show up here: they are reported
//! through [`Scanner::report_error`](crate::Scanner::report_error) and the
//! parse carries on. A [`ParseError`] is returned only when a parse ends
//! without accepting.

use thiserror::Error;

/// A table set failed validation in [`TablesBuilder::build`](crate::TablesBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table set has no states")]
    NoStates,

    #[error("too many states ({0}) for the action encoding")]
    TooManyStates(usize),

    #[error("terminal 0 is reserved and cannot be the {0} terminal")]
    ReservedTerminal(&'static str),

    #[error("state {state}: terminal 0 is reserved and cannot key an action")]
    ReservedKey { state: usize },

    #[error("state {state}: shift to unknown state {target}")]
    ShiftOutOfRange { state: usize, target: usize },

    #[error("state {state}: reduce by unknown rule {rule}")]
    UnknownRule { state: usize, rule: usize },

    #[error("state {state}: goto on nonterminal {nonterminal} leads to unknown state {target}")]
    GotoOutOfRange {
        state: usize,
        nonterminal: u16,
        target: u32,
    },

    #[error("rule {0} cannot be the accept rule")]
    InvalidAcceptRule(usize),
}

/// Why a parse ended without accepting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A semantic action returned [`Control::Abort`](crate::Control::Abort).
    #[error("parse aborted by a semantic action")]
    Aborted,

    /// No state left on the stack can shift the error terminal.
    #[error("unrecoverable syntax error")]
    Unrecoverable,

    /// Input ran out while skipping tokens to recover from a syntax error.
    #[error("unexpected end of input while recovering from a syntax error")]
    UnexpectedEnd,

    #[error("parser stack exceeded {limit} entries")]
    StackOverflow { limit: usize },
}
