//! # Calculator Scanner
//!
//! A [`Lexicon`] compiles the calculator's token patterns into one dense DFA
//! with `regex-automata`; [`Lexicon::scan`] then yields a [`CalcLexer`] over a
//! source string. Each step runs an anchored search at the current offset,
//! and the pattern that matched becomes the token.
//!
//! Whitespace and `#` comments are skipped. A character that starts no token
//! is returned as [`TokenID::Invalid`], which the grammar never accepts, so
//! it surfaces as an ordinary syntax error. An integer literal that does not
//! fit in `i64` is reported as a [`Diagnostic`] and also returned as
//! `Invalid`; the syntax error the parser then reports for that token is
//! dropped. Literals are unsigned, so `i64::MIN` can only be computed, for
//! example as `-9223372036854775807 - 1`.

use crate::{CalcError, TokenID, TokenValue};
use lrdrive::{Position, Scanner, Span, Terminal};
use regex_automata::{
    Anchored, Input,
    dfa::{Automaton, dense},
};
use smartstring::alias::String;
use std::fmt;

/// Token patterns, indexed by [`Rule`].
const PATTERNS: [&str; 12] = [
    r"[ \t\r\n]+",
    r"#[^\n]*",
    r"[0-9]+",
    r"[A-Za-z_][A-Za-z0-9_]*",
    r"\+",
    r"-",
    r"\*",
    r"/",
    r"\(",
    r"\)",
    r"=",
    r";",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    WhiteSpace,
    Comment,
    Number,
    Ident,
    Plus,
    Minus,
    Asterisk,
    Slash,
    LeftParen,
    RightParen,
    Equals,
    Semicolon,
}

impl Rule {
    const ALL: [Rule; 12] = [
        Rule::WhiteSpace,
        Rule::Comment,
        Rule::Number,
        Rule::Ident,
        Rule::Plus,
        Rule::Minus,
        Rule::Asterisk,
        Rule::Slash,
        Rule::LeftParen,
        Rule::RightParen,
        Rule::Equals,
        Rule::Semicolon,
    ];
}

/// A lexical or syntax error message with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

/// The compiled token automaton. Build once, scan any number of sources.
#[derive(Debug, Clone)]
pub struct Lexicon {
    dfa: dense::DFA<Vec<u32>>,
}

impl Lexicon {
    pub fn try_new() -> Result<Self, CalcError> {
        let dfa = dense::DFA::new_many(&PATTERNS)?;
        log::debug!("built scanner DFA: {} bytes", dfa.memory_usage());
        Ok(Self { dfa })
    }

    pub fn scan<'a>(&'a self, source: &'a str) -> CalcLexer<'a> {
        CalcLexer {
            dfa: &self.dfa,
            source,
            pos: 0,
            at: Position::default(),
            value: TokenValue::None,
            span: Span::point(Position::default()),
            diagnostics: Vec::new(),
        }
    }
}

/// Scanner over one calculator source string.
///
/// Positions are 0-based line/column pairs counted in characters. At end of
/// input the scanner keeps returning [`TokenID::End`] with an empty span at
/// the final position.
///
/// # Example
///
/// ```rust
/// # use lrdrive::{Scanner, Terminal};
/// # use lrdrive_calc::{Lexicon, TokenID, TokenValue};
/// let lexicon = Lexicon::try_new().unwrap();
/// let mut lexer = lexicon.scan("x = 42;");
/// assert_eq!(lexer.next_token(), Terminal::from(TokenID::Ident));
/// assert_eq!(lexer.value(), TokenValue::Ident("x".into()));
/// assert_eq!(lexer.next_token(), Terminal::from(TokenID::Equals));
/// assert_eq!(lexer.next_token(), Terminal::from(TokenID::Number));
/// assert_eq!(lexer.value(), TokenValue::Number(42));
/// ```
pub struct CalcLexer<'a> {
    dfa: &'a dense::DFA<Vec<u32>>,
    source: &'a str,
    pos: usize,
    at: Position,
    value: TokenValue,
    span: Span,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CalcLexer<'a> {
    /// Diagnostics recorded so far, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Longest token starting at the current offset, or `None` if no
    /// pattern matches there.
    fn longest_match(&self) -> Option<(Rule, usize)> {
        let input = Input::new(self.source)
            .span(self.pos..self.source.len())
            .anchored(Anchored::Yes);
        match self.dfa.try_search_fwd(&input) {
            Ok(Some(m)) if m.offset() > self.pos => {
                Rule::ALL.get(m.pattern().as_usize()).map(|rule| (*rule, m.offset()))
            }
            Ok(_) => None,
            Err(err) => {
                log::warn!("scanner search failed at offset {}: {err}", self.pos);
                None
            }
        }
    }

    fn advance_to(&mut self, end: usize) -> &'a str {
        let text = &self.source[self.pos..end];
        let start = self.at;
        self.at.advance(text);
        self.pos = end;
        self.span = Span::new(start, self.at);
        text
    }

    fn scan(&mut self) -> TokenID {
        self.value = TokenValue::None;
        loop {
            if self.pos >= self.source.len() {
                self.span = Span::point(self.at);
                return TokenID::End;
            }
            let Some((rule, end)) = self.longest_match() else {
                let width = self.source[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                let text = self.advance_to(self.pos + width);
                log::trace!("invalid character {text:?} at {}", self.span);
                return TokenID::Invalid;
            };
            let text = self.advance_to(end);
            return match rule {
                Rule::WhiteSpace | Rule::Comment => continue,
                Rule::Number => match text.parse::<i64>() {
                    Ok(n) => {
                        self.value = TokenValue::Number(n);
                        TokenID::Number
                    }
                    Err(err) => {
                        self.diagnostics.push(Diagnostic {
                            message: format!("invalid number {text}: {err}").into(),
                            span: self.span,
                        });
                        TokenID::Invalid
                    }
                },
                Rule::Ident => {
                    self.value = TokenValue::Ident(text.into());
                    TokenID::Ident
                }
                Rule::Plus => TokenID::Plus,
                Rule::Minus => TokenID::Minus,
                Rule::Asterisk => TokenID::Asterisk,
                Rule::Slash => TokenID::Slash,
                Rule::LeftParen => TokenID::LeftParen,
                Rule::RightParen => TokenID::RightParen,
                Rule::Equals => TokenID::Equals,
                Rule::Semicolon => TokenID::Semicolon,
            };
        }
    }
}

impl Scanner for CalcLexer<'_> {
    type Value = TokenValue;
    type Span = Span;

    fn next_token(&mut self) -> Terminal {
        let token = self.scan();
        log::trace!("token {} at {}", token.label(), self.span);
        token.into()
    }

    fn value(&mut self) -> TokenValue {
        std::mem::take(&mut self.value)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn report_error(&mut self, message: &str, span: &Span) {
        // A token the scanner already diagnosed gets no second report.
        if self.diagnostics.last().is_some_and(|last| last.span == *span) {
            log::debug!("{span}: {message} (already reported)");
            return;
        }
        self.diagnostics.push(Diagnostic {
            message: message.into(),
            span: *span,
        });
    }
}
