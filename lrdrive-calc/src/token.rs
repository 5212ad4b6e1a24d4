//! # Calculator Token Values
//!
//! [`TokenValue`] is the payload the calculator keeps on the engine's value
//! stack. The scanner produces it for tokens, and the semantic actions reuse
//! it for reduced symbols: every `Expr`, `Term` and `Factor` carries a
//! [`TokenValue::Number`].
use smartstring::alias::String;

/// The payload carried by a token or a reduced symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenValue {
    /// No associated data (operators, punctuation, statements).
    #[default]
    None,

    /// Identifier name, resolved against the symbol table by the actions.
    Ident(String),

    /// Integer literal, or the value of an evaluated expression.
    Number(i64),
}
