use crate::Terminal;

/// The token source an [`Engine`](crate::Engine) pulls from.
///
/// The engine calls [`next_token`](Scanner::next_token) only when it has no
/// lookahead buffered, and reads [`value`](Scanner::value) and
/// [`span`](Scanner::span) for the token returned most recently.
pub trait Scanner {
    /// Semantic value attached to a token.
    type Value;

    /// Location of a token.
    type Span;

    /// Returns the next terminal.
    ///
    /// Must never return [`Terminal::NONE`]. Once input is exhausted it must
    /// return the grammar's end-of-input terminal, and keep returning it on
    /// every later call.
    fn next_token(&mut self) -> Terminal;

    /// Hands over the value of the most recently returned token. Called once
    /// for each token the engine shifts.
    fn value(&mut self) -> Self::Value;

    /// Location of the most recently returned token. Before the first token
    /// it is the location of the start of input.
    fn span(&self) -> Self::Span;

    /// Receives a syntax-error diagnostic together with the offending
    /// token's location. Called at most once per error region.
    fn report_error(&mut self, message: &str, span: &Self::Span);
}
