//! LALR(1) tables for the calculator grammar.
//!
//! ```text
//! 0  $accept -> Program $end
//! 1  Program -> Stmts
//! 2  Stmts   -> ε
//! 3  Stmts   -> Stmts Stmt
//! 4  Stmt    -> Expr ';'
//! 5  Stmt    -> ident '=' Expr ';'
//! 6  Stmt    -> error ';'
//! 7  Expr    -> Expr '+' Term
//! 8  Expr    -> Expr '-' Term
//! 9  Expr    -> Term
//! 10 Term    -> Term '*' Factor
//! 11 Term    -> Term '/' Factor
//! 12 Term    -> Factor
//! 13 Factor  -> number
//! 14 Factor  -> ident
//! 15 Factor  -> '(' Expr ')'
//! 16 Factor  -> '-' Factor
//! ```
//!
//! Precedence and associativity are encoded in the grammar itself, so the
//! automaton has no conflicts. States whose only decision is a single
//! reduction carry no lookahead table.

use lrdrive::{
    ActionCode, Nonterminal, Rule, RuleId, State, StateId, Symbol, TableError, Tables, Terminal,
};

/// Terminal ids. 0 is reserved by the engine for "no lookahead".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TokenID {
    End = 1,
    Error = 2,
    Number = 3,
    Ident = 4,
    Plus = 5,
    Minus = 6,
    Asterisk = 7,
    Slash = 8,
    LeftParen = 9,
    RightParen = 10,
    Equals = 11,
    Semicolon = 12,
    /// A character no token starts with. No state accepts it.
    Invalid = 13,
}

impl TokenID {
    pub const LABELS: [&'static str; 14] = [
        "",
        "$end",
        "error",
        "number",
        "identifier",
        "'+'",
        "'-'",
        "'*'",
        "'/'",
        "'('",
        "')'",
        "'='",
        "';'",
        "invalid token",
    ];

    pub fn label(self) -> &'static str {
        Self::LABELS[self as usize]
    }
}

impl From<TokenID> for Terminal {
    fn from(id: TokenID) -> Self {
        Terminal(id as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NonterminalID {
    Accept = 0,
    Program = 1,
    Stmts = 2,
    Stmt = 3,
    Expr = 4,
    Term = 5,
    Factor = 6,
}

impl NonterminalID {
    pub const LABELS: [&'static str; 7] =
        ["$accept", "Program", "Stmts", "Stmt", "Expr", "Term", "Factor"];
}

impl From<NonterminalID> for Nonterminal {
    fn from(id: NonterminalID) -> Self {
        Nonterminal(id as u16)
    }
}

/// Production ids, numbered as the rules above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProdID {
    Start = 0,
    Program = 1,
    Stmts1 = 2,
    Stmts2 = 3,
    Stmt1 = 4,
    Stmt2 = 5,
    Stmt3 = 6,
    Expr1 = 7,
    Expr2 = 8,
    Expr3 = 9,
    Term1 = 10,
    Term2 = 11,
    Term3 = 12,
    Factor1 = 13,
    Factor2 = 14,
    Factor3 = 15,
    Factor4 = 16,
}

impl ProdID {
    const ALL: [ProdID; 17] = [
        ProdID::Start,
        ProdID::Program,
        ProdID::Stmts1,
        ProdID::Stmts2,
        ProdID::Stmt1,
        ProdID::Stmt2,
        ProdID::Stmt3,
        ProdID::Expr1,
        ProdID::Expr2,
        ProdID::Expr3,
        ProdID::Term1,
        ProdID::Term2,
        ProdID::Term3,
        ProdID::Factor1,
        ProdID::Factor2,
        ProdID::Factor3,
        ProdID::Factor4,
    ];

    pub fn from_rule(rule: RuleId) -> Option<Self> {
        Self::ALL.get(usize::from(rule)).copied()
    }
}

impl From<ProdID> for RuleId {
    fn from(id: ProdID) -> Self {
        RuleId(id as u16)
    }
}

use NonterminalID as N;
use TokenID as T;

const fn t(id: TokenID) -> Symbol {
    Symbol::Terminal(Terminal(id as u16))
}

const fn n(id: NonterminalID) -> Symbol {
    Symbol::Nonterminal(Nonterminal(id as u16))
}

const RULES: [(NonterminalID, &[Symbol]); 17] = [
    (N::Accept, &[n(N::Program), t(T::End)]),
    (N::Program, &[n(N::Stmts)]),
    (N::Stmts, &[]),
    (N::Stmts, &[n(N::Stmts), n(N::Stmt)]),
    (N::Stmt, &[n(N::Expr), t(T::Semicolon)]),
    (N::Stmt, &[t(T::Ident), t(T::Equals), n(N::Expr), t(T::Semicolon)]),
    (N::Stmt, &[t(T::Error), t(T::Semicolon)]),
    (N::Expr, &[n(N::Expr), t(T::Plus), n(N::Term)]),
    (N::Expr, &[n(N::Expr), t(T::Minus), n(N::Term)]),
    (N::Expr, &[n(N::Term)]),
    (N::Term, &[n(N::Term), t(T::Asterisk), n(N::Factor)]),
    (N::Term, &[n(N::Term), t(T::Slash), n(N::Factor)]),
    (N::Term, &[n(N::Factor)]),
    (N::Factor, &[t(T::Number)]),
    (N::Factor, &[t(T::Ident)]),
    (N::Factor, &[t(T::LeftParen), n(N::Expr), t(T::RightParen)]),
    (N::Factor, &[t(T::Minus), n(N::Factor)]),
];

struct Row {
    actions: &'static [(TokenID, ActionCode)],
    default: ActionCode,
    gotos: &'static [(NonterminalID, u32)],
}

const fn row(
    actions: &'static [(TokenID, ActionCode)],
    default: ActionCode,
    gotos: &'static [(NonterminalID, u32)],
) -> Row {
    Row {
        actions,
        default,
        gotos,
    }
}

const STATES: [Row; 28] = [
    /* 0 */ row(&[], -2, &[(N::Stmts, 1)]),
    /* 1 */
    row(
        &[
            (T::End, -1),
            (T::Error, 12),
            (T::Number, 6),
            (T::Ident, 7),
            (T::LeftParen, 8),
            (T::Minus, 9),
        ],
        0,
        &[(N::Stmt, 2), (N::Expr, 3), (N::Term, 4), (N::Factor, 5)],
    ),
    /* 2 */ row(&[], -3, &[]),
    /* 3 */ row(&[(T::Semicolon, 14), (T::Plus, 15), (T::Minus, 16)], 0, &[]),
    /* 4 */
    row(
        &[
            (T::Asterisk, 19),
            (T::Slash, 20),
            (T::Semicolon, -9),
            (T::Plus, -9),
            (T::Minus, -9),
            (T::RightParen, -9),
        ],
        0,
        &[],
    ),
    /* 5 */ row(&[], -12, &[]),
    /* 6 */ row(&[], -13, &[]),
    /* 7 */
    row(
        &[
            (T::Equals, 23),
            (T::Asterisk, -14),
            (T::Slash, -14),
            (T::Semicolon, -14),
            (T::Plus, -14),
            (T::Minus, -14),
        ],
        0,
        &[],
    ),
    /* 8 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Expr, 26), (N::Term, 4), (N::Factor, 5)],
    ),
    /* 9 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Factor, 11)],
    ),
    /* 10 */ row(&[], -14, &[]),
    /* 11 */ row(&[], -16, &[]),
    /* 12 */ row(&[(T::Semicolon, 13)], 0, &[]),
    /* 13 */ row(&[], -6, &[]),
    /* 14 */ row(&[], -4, &[]),
    /* 15 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Term, 17), (N::Factor, 5)],
    ),
    /* 16 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Term, 18), (N::Factor, 5)],
    ),
    /* 17 */
    row(
        &[
            (T::Asterisk, 19),
            (T::Slash, 20),
            (T::Semicolon, -7),
            (T::Plus, -7),
            (T::Minus, -7),
            (T::RightParen, -7),
        ],
        0,
        &[],
    ),
    /* 18 */
    row(
        &[
            (T::Asterisk, 19),
            (T::Slash, 20),
            (T::Semicolon, -8),
            (T::Plus, -8),
            (T::Minus, -8),
            (T::RightParen, -8),
        ],
        0,
        &[],
    ),
    /* 19 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Factor, 21)],
    ),
    /* 20 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Factor, 22)],
    ),
    /* 21 */ row(&[], -10, &[]),
    /* 22 */ row(&[], -11, &[]),
    /* 23 */
    row(
        &[(T::Number, 6), (T::Ident, 10), (T::LeftParen, 8), (T::Minus, 9)],
        0,
        &[(N::Expr, 24), (N::Term, 4), (N::Factor, 5)],
    ),
    /* 24 */ row(&[(T::Semicolon, 25), (T::Plus, 15), (T::Minus, 16)], 0, &[]),
    /* 25 */ row(&[], -5, &[]),
    /* 26 */ row(&[(T::RightParen, 27), (T::Plus, 15), (T::Minus, 16)], 0, &[]),
    /* 27 */ row(&[], -15, &[]),
];

/// Builds and validates the calculator's table set.
pub fn tables() -> Result<Tables, TableError> {
    let rules = RULES
        .iter()
        .map(|(lhs, rhs)| Rule::new(Nonterminal::from(*lhs), rhs.to_vec()));
    let states = STATES.iter().map(|row| {
        let mut state = State::builder().default_code(row.default);
        for &(token, code) in row.actions {
            state = state.on_code(token.into(), code);
        }
        for &(nonterminal, target) in row.gotos {
            state = state.goto(nonterminal.into(), StateId(target));
        }
        state.build()
    });
    Tables::builder()
        .rules(rules)
        .states(states)
        .end_terminal(TokenID::End.into())
        .error_terminal(TokenID::Error.into())
        .accept_rule(ProdID::Program.into())
        .terminal_names(TokenID::LABELS)
        .nonterminal_names(NonterminalID::LABELS)
        .build()
}
